//! Shared record fixtures for conversion tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fieldbridge_core::{
    CachedStrategy, Callback, CompiledStrategy, ConversionCache, ConversionStrategy,
    DescribedRecord, FieldDescriptor, NaiveStrategy, Record, ScalarKind, TypeDescriptor, Value,
    WireTimestamp, record,
};
use fieldbridge_types::{TypeError, TypeResult};
use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

// ── User pair: every supported kind combination ──────────────────

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AddressMessage as "AddressMessage" {
        pub street: String,
        pub city: String,
        pub zip: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address as "Address" {
        pub street: String,
        pub city: String,
        pub zip: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ItemMessage as "ItemMessage" {
        pub id: i32,
        pub name: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Item as "Item" {
        pub id: i64,
        pub name: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UserMessage as "UserMessage" {
        pub id: i32,
        pub name: String,
        pub email: Option<String>,
        pub age: u32,
        pub score: f64,
        pub created_at: WireTimestamp,
        pub password: String,
        pub avatar: Vec<u8>,
        pub tags: Vec<String>,
        pub address: Option<AddressMessage> => optional_record,
        pub items: Vec<ItemMessage> => records,
        pub on_complete: Callback,
        pub trace_id: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct User as "User" {
        pub id: i64,
        pub name: String,
        pub email: String,
        pub age: Option<i64>,
        pub score: f32,
        pub created_at: DateTime<Utc>,
        #[sensitive]
        pub password: String,
        #[sensitive]
        pub avatar: Vec<u8>,
        pub tags: Vec<String>,
        pub address: Address => record,
        pub items: Vec<Item> => records,
        pub internal_note: String,
    }
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
        .single()
        .unwrap_or_default()
}

pub fn user_message() -> UserMessage {
    UserMessage {
        id: 42,
        name: "Ada".into(),
        email: Some("ada@example.com".into()),
        age: 36,
        score: 9.5,
        created_at: WireTimestamp::from_datetime(created_at()),
        password: "hunter2".into(),
        avatar: vec![1, 2, 3],
        tags: vec!["math".into(), "engines".into()],
        address: Some(AddressMessage {
            street: "12 St James's Square".into(),
            city: "London".into(),
            zip: "SW1Y 4JH".into(),
        }),
        items: vec![
            ItemMessage {
                id: 1,
                name: "a".into(),
            },
            ItemMessage {
                id: 2,
                name: "b".into(),
            },
        ],
        on_complete: Callback::new(|| {}),
        trace_id: "trace-1".into(),
    }
}

pub fn user() -> User {
    User {
        id: 42,
        name: "Ada".into(),
        email: "ada@example.com".into(),
        age: Some(36),
        score: 9.5,
        created_at: created_at(),
        password: "hunter2".into(),
        avatar: vec![1, 2, 3],
        tags: vec!["math".into(), "engines".into()],
        address: Address {
            street: "12 St James's Square".into(),
            city: "London".into(),
            zip: Some("SW1Y 4JH".into()),
        },
        items: vec![
            Item {
                id: 1,
                name: "a".into(),
            },
            Item {
                id: 2,
                name: "b".into(),
            },
        ],
        internal_note: String::new(),
    }
}

// ── Small pairs for single behaviors ─────────────────────────────

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct HandlerMessage as "HandlerMessage" {
        pub id: i64,
        pub name: String,
        pub handler: Callback,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Handler as "Handler" {
        pub id: i64,
        pub name: String,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct OrderMessage as "OrderMessage" {
        pub items: Vec<ItemMessage> => records,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Order as "Order" {
        pub items: Vec<Item> => records,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct LedgerMessage as "LedgerMessage" {
        pub first: i64,
        pub second: String,
        pub third: i64,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Ledger as "Ledger" {
        pub first: i64,
        pub second: i64,
        pub third: i64,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CounterMessage as "CounterMessage" {
        pub count: i64,
        pub ratio: f64,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Counter as "Counter" {
        pub count: i32,
        pub ratio: f32,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TreeMessage as "TreeMessage" {
        pub value: i32,
        pub children: Vec<TreeMessage> => records,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Tree as "Tree" {
        pub value: i64,
        pub children: Vec<Tree> => records,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct EventMessage as "EventMessage" {
        pub at: WireTimestamp,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Event as "Event" {
        pub at: DateTime<Utc>,
    }
}

// ── A hand-written record whose descriptor repeats a field name ──

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Duplicated {
    pub id: i64,
}

impl DescribedRecord for Duplicated {
    fn type_descriptor() -> &'static TypeDescriptor {
        static DESCRIPTOR: OnceLock<TypeDescriptor> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::new(
                "Duplicated",
                TypeId::of::<Duplicated>(),
                vec![
                    FieldDescriptor::scalar("id", ScalarKind::I64),
                    FieldDescriptor::scalar("id", ScalarKind::I64),
                ],
                || Box::new(Duplicated::default()),
            )
        })
    }
}

impl Record for Duplicated {
    fn descriptor(&self) -> &'static TypeDescriptor {
        Self::type_descriptor()
    }

    fn get_field(&self, index: usize) -> Option<Value> {
        (index < 2).then(|| Value::I64(self.id))
    }

    fn set_field(&mut self, index: usize, value: Value) -> TypeResult<()> {
        match (index, value) {
            (0 | 1, Value::I64(id)) => {
                self.id = id;
                Ok(())
            }
            (0 | 1, other) => Err(TypeError::InvalidValue {
                record: "Duplicated",
                field: "id",
                expected: "i64".into(),
                actual: other.type_name(),
            }),
            _ => Err(TypeError::FieldIndexOutOfRange {
                record: "Duplicated",
                index,
            }),
        }
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ── Strategy helpers ─────────────────────────────────────────────

/// One instance of each tier, the caching ones on fresh isolated caches.
pub fn isolated_strategies() -> Vec<Box<dyn ConversionStrategy>> {
    vec![
        Box::new(NaiveStrategy::new()),
        Box::new(CachedStrategy::with_cache(Arc::new(ConversionCache::new()))),
        Box::new(CompiledStrategy::with_caches(
            Arc::new(ConversionCache::new()),
            Arc::new(ConversionCache::new()),
        )),
    ]
}

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
