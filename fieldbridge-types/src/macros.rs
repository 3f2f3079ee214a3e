/// Declares a record struct together with its [`Record`](crate::Record) and
/// [`DescribedRecord`](crate::DescribedRecord) implementations.
///
/// The struct must derive (or implement) `Debug`, `Clone` and `Default`.
/// Fields are scalars by default; nested records are marked after the type
/// with `=> record`, `=> optional_record` or `=> records`. A `#[sensitive]`
/// marker flags the field for masking.
///
/// ```
/// use fieldbridge_types::{record, DescribedRecord};
///
/// record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct AddressModel as "AddressModel" {
///         pub city: String,
///         pub zip: Option<String>,
///     }
/// }
///
/// record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct UserModel as "UserModel" {
///         pub id: i64,
///         #[sensitive]
///         pub password: String,
///         pub address: Option<AddressModel> => optional_record,
///     }
/// }
///
/// let descriptor = UserModel::type_descriptor();
/// assert_eq!(descriptor.name(), "UserModel");
/// assert!(descriptor.field("password").unwrap().is_sensitive());
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $type_name:literal {
            $(
                $(#[$flag:ident])*
                $field_vis:vis $field:ident : $field_ty:ty $(=> $adapter:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $field_vis $field: $field_ty, )*
        }

        impl $crate::DescribedRecord for $name {
            fn type_descriptor() -> &'static $crate::TypeDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::TypeDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::TypeDescriptor::new(
                        $type_name,
                        ::std::any::TypeId::of::<$name>(),
                        ::std::vec![
                            $(
                                $crate::FieldDescriptor::new(
                                    ::std::stringify!($field),
                                    <$crate::__field_adapter!($($adapter)?)
                                        as $crate::FieldAdapter<$field_ty>>::kind(),
                                    false $(|| $crate::__field_flag!($flag))*,
                                ),
                            )*
                        ],
                        || -> ::std::boxed::Box<dyn $crate::Record> {
                            ::std::boxed::Box::new(<$name as ::std::default::Default>::default())
                        },
                    )
                })
            }
        }

        impl $crate::Record for $name {
            fn descriptor(&self) -> &'static $crate::TypeDescriptor {
                <Self as $crate::DescribedRecord>::type_descriptor()
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn get_field(&self, index: usize) -> ::std::option::Option<$crate::Value> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::std::option::Option::Some(
                            <$crate::__field_adapter!($($adapter)?)
                                as $crate::FieldAdapter<$field_ty>>::get(&self.$field),
                        );
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn set_field(&mut self, index: usize, value: $crate::Value) -> $crate::TypeResult<()> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return <$crate::__field_adapter!($($adapter)?)
                            as $crate::FieldAdapter<$field_ty>>::set(&mut self.$field, value)
                            .map_err(|rejected| $crate::TypeError::InvalidValue {
                                record: $type_name,
                                field: ::std::stringify!($field),
                                expected: ::std::string::ToString::to_string(
                                    &<$crate::__field_adapter!($($adapter)?)
                                        as $crate::FieldAdapter<$field_ty>>::kind(),
                                ),
                                actual: rejected.type_name(),
                            });
                    }
                    position += 1;
                )*
                ::std::result::Result::Err($crate::TypeError::FieldIndexOutOfRange {
                    record: $type_name,
                    index,
                })
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn $crate::Record> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_adapter {
    () => { $crate::Scalar };
    (record) => { $crate::Nested };
    (optional_record) => { $crate::OptionalNested };
    (records) => { $crate::NestedList };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_flag {
    (sensitive) => { true };
    ($other:ident) => { false };
}
