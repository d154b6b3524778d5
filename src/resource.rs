//! Resource descriptors: the three record collections and their generated fields.

use crate::keygen::{self, DurationStrategy, KeyScheme};
use serde_json::{Map, Value};

/// Static description of one CRUD resource.
#[derive(Clone, Copy, Debug)]
pub struct ResourceSpec {
    /// Path segment the collection is mounted under.
    pub path: &'static str,
    /// Key field name inside stored records.
    pub key_field: &'static str,
    pub key: KeyScheme,
    /// Fields that must be present on create; everything else is accepted
    /// and stored as-is.
    pub required: &'static [&'static str],
    pub stamps: StampFields,
    /// Spanish labels used in client-facing messages.
    pub singular: &'static str,
    pub plural: &'static str,
}

/// Server-set fields added on create, besides the key.
#[derive(Clone, Copy, Debug)]
pub enum StampFields {
    None,
    /// `order_date`: creation timestamp.
    OrderDate,
    /// `date`, `time` and a synthetic `duration`.
    Visit(DurationStrategy),
}

pub const PRODUCTS: ResourceSpec = ResourceSpec {
    path: "products",
    key_field: "idProduct",
    key: KeyScheme::SequentialInt,
    required: &[],
    stamps: StampFields::None,
    singular: "producto",
    plural: "productos",
};

pub const ORDERS: ResourceSpec = ResourceSpec {
    path: "orders",
    key_field: "order_id",
    key: KeyScheme::SequentialInt,
    required: &[],
    stamps: StampFields::OrderDate,
    singular: "pedido",
    plural: "pedidos",
};

/// Page-visit descriptor. Key scheme and duration strategy vary by deployment,
/// so this one is built rather than const.
pub fn page_visits(key: KeyScheme, strategy: DurationStrategy) -> ResourceSpec {
    ResourceSpec {
        path: "usersIntoPage",
        key_field: "user_id",
        key,
        required: &["device", "path", "country", "city"],
        stamps: StampFields::Visit(strategy),
        singular: "usuario",
        plural: "usuarios",
    }
}

impl ResourceSpec {
    /// Key plus server-set stamps for a new record. `existing` feeds the
    /// sequential scheme; the other schemes ignore it.
    pub fn generated_fields(&self, existing: &[Value]) -> Map<String, Value> {
        let mut out = Map::new();
        let key = match self.key {
            KeyScheme::SequentialInt => {
                Value::from(keygen::next_int_key(existing, self.key_field))
            }
            KeyScheme::LetterPrefixMillis => Value::String(keygen::visit_id()),
            KeyScheme::Uuid => Value::String(keygen::uuid_key()),
        };
        out.insert(self.key_field.to_string(), key);
        match self.stamps {
            StampFields::None => {}
            StampFields::OrderDate => {
                out.insert("order_date".into(), Value::String(keygen::created_stamp()));
            }
            StampFields::Visit(strategy) => {
                out.insert("date".into(), Value::String(keygen::date_stamp()));
                out.insert("time".into(), Value::String(keygen::time_stamp()));
                out.insert(
                    "duration".into(),
                    Value::String(keygen::duration_stamp(strategy)),
                );
            }
        }
        out
    }

    /// Whether `record`'s key field equals the raw path id. Integer keys
    /// compare numerically, string keys compare verbatim.
    pub fn key_matches(&self, record: &Value, raw: &str) -> bool {
        match record.get(self.key_field) {
            Some(Value::Number(n)) => raw.parse::<i64>().ok() == n.as_i64(),
            Some(Value::String(s)) => s == raw,
            _ => false,
        }
    }
}
