//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Insertion sequence, used as the final sort tie-breaker.
        sequence -> Int8,
        /// Trimmed title.
        #[max_length = 200]
        title -> Varchar,
        /// Trimmed description.
        #[max_length = 1000]
        description -> Varchar,
        /// Completion flag.
        completed -> Bool,
        /// Priority name.
        #[max_length = 16]
        priority -> Varchar,
        /// Category.
        #[max_length = 50]
        category -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Ordered tags.
        tags -> Array<Text>,
        /// Status name.
        #[max_length = 16]
        status -> Varchar,
        /// Progress percentage.
        progress -> Int2,
        /// Recurrence rule payload.
        repeat -> Jsonb,
        /// Notes payload.
        notes -> Jsonb,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
