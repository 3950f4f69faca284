use serde::{Deserialize, Serialize};

/// Read-only projection of a row in the external user record store.
///
/// Records are created, mutated, and deleted entirely outside this system;
/// nothing in this workspace writes them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub phone_no: String,
    pub pincode: String,
    pub address: String,
}

/// Column names of the record store schema, in store order.
///
/// Used by the prompt builders so the schema enumerated to the model stays
/// in lockstep with the struct above.
pub const USER_SCHEMA_FIELDS: [&str; 7] =
    ["id", "name", "age", "gender", "phone_no", "pincode", "address"];
