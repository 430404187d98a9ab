use redb::TableDefinition;

/// Vote tallies: (subject, sub_index) -> VoteTally (msgpack)
pub const VOTE_TALLIES: TableDefinition<(&str, u32), &[u8]> = TableDefinition::new("vote_tallies");

/// Photo records: id -> PhotoRecord (msgpack)
pub const PHOTOS: TableDefinition<u64, &[u8]> = TableDefinition::new("photos");

/// Dish index: (subject, sub_index) -> msgpack Vec of photo ids
pub const SUBJECT_PHOTOS: TableDefinition<(&str, u32), &[u8]> =
    TableDefinition::new("subject_photos");

/// Monotonic counters: name -> last value handed out
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub const PHOTO_ID_SEQUENCE: &str = "photo_id";
