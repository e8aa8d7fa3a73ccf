use redb::TableDefinition;

/// Entities table: `<entityName>:<id>` -> JSON document
///
/// Holds every entity record: `user:<uuid>`, `habit:<uuid>`, and the
/// email uniqueness records under `user:email:<email>`.
pub const ENTITIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entities");

/// Indexes table: index name -> JSON `Vec<String>` of entity IDs
///
/// Listing indexes: `users`, `habits` (per entity kind) and
/// `habits:<userId>` (per owner, in insertion order).
pub const INDEXES: TableDefinition<&str, &[u8]> = TableDefinition::new("indexes");
