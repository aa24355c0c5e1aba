// Column types are shared by the SQLite and PostgreSQL backends.

diesel::table! {
    items (id) {
        id -> Integer,
        title -> Varchar,
        description -> Nullable<Text>,
        completed -> Bool,
    }
}
