use recordkit_core::db::open_db_in_memory;
use recordkit_core::repo::{ActiveRecord, RecordError};
use recordkit_core::{RelationalConnection, SqliteConnection};

fn person_db() -> SqliteConnection {
    let conn = open_db_in_memory().unwrap();
    conn.exec(
        "create table person (
            id integer primary key autoincrement,
            first_name text,
            last_name text,
            nickname text default 'none'
        )",
        &[],
    )
    .unwrap();
    conn
}

#[test]
fn schema_is_discovered_in_declaration_order() {
    let conn = person_db();
    let person = ActiveRecord::new(&conn, "person").unwrap();

    assert_eq!(person.table(), "person");
    assert_eq!(
        person.columns(),
        ["id", "first_name", "last_name", "nickname"]
    );
    let writable: Vec<&str> = person.fields().map(|(column, _)| column).collect();
    assert_eq!(writable, vec!["first_name", "last_name", "nickname"]);
}

#[test]
fn camel_case_fields_map_to_snake_case_columns() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();

    person.set("firstName", "Ada").unwrap();

    assert_eq!(person.get("firstName").unwrap(), Some("Ada"));
    assert_eq!(person.get("first_name").unwrap(), Some("Ada"));
    assert_eq!(person.get("lastName").unwrap(), None);
}

#[test]
fn undiscovered_field_is_an_unknown_column() {
    let conn = open_db_in_memory().unwrap();
    conn.exec("create table person (id integer primary key, first_name text)", &[])
        .unwrap();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    person.set("firstName", "Ada").unwrap();

    assert_eq!(person.get("firstName").unwrap(), Some("Ada"));

    let read_err = person.get("lastName").unwrap_err();
    assert!(matches!(
        read_err,
        RecordError::UnknownColumn { ref table, ref column } if table == "person" && column == "last_name"
    ));

    let write_err = person.set("lastName", "Lovelace").unwrap_err();
    assert!(matches!(write_err, RecordError::UnknownColumn { .. }));
}

#[test]
fn id_is_never_writable() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();

    for field in ["id", "ID", "Id"] {
        let err = person.set(field, "5").unwrap_err();
        assert!(matches!(err, RecordError::ImmutableField(ref column) if column == "id"));
    }
    assert!(matches!(
        person.set_null("id").unwrap_err(),
        RecordError::ImmutableField(_)
    ));

    person.save().unwrap();
    assert!(matches!(
        person.set("id", "5").unwrap_err(),
        RecordError::ImmutableField(_)
    ));
}

#[test]
fn full_lifecycle_against_sqlite() {
    let conn = person_db();

    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    assert!(!person.is_saved());
    assert_eq!(person.get("id").unwrap(), None);

    person.set("firstName", "Ada").unwrap();
    person.set("lastName", "O'Brien \\ ? \"quoted\"").unwrap();
    person.save().unwrap();

    let id = person.id().unwrap().to_string();
    assert_eq!(id, "1");
    assert_eq!(person.get("id").unwrap(), Some("1"));

    person.set("firstName", "Grace").unwrap();
    person.save().unwrap();

    let count = conn
        .query_one("select count(*) as total from person", &[])
        .unwrap()
        .unwrap();
    assert_eq!(count.get("total"), Some("1"));

    let reloaded = ActiveRecord::load(&conn, "person", id.as_str()).unwrap();
    assert!(reloaded.is_found());
    assert_eq!(reloaded.get("firstName").unwrap(), Some("Grace"));
    assert_eq!(
        reloaded.get("lastName").unwrap(),
        Some("O'Brien \\ ? \"quoted\"")
    );
    assert_eq!(reloaded.get("nickname").unwrap(), Some("none"));

    reloaded.delete().unwrap();
    let gone = ActiveRecord::load(&conn, "person", id.as_str()).unwrap();
    assert!(gone.is_saved());
    assert!(!gone.is_found());
}

#[test]
fn unset_fields_keep_column_defaults_on_insert() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    person.set("firstName", "Ada").unwrap();
    person.save().unwrap();

    let row = conn
        .query_one("select nickname, last_name from person where id = ?", &["1".into()])
        .unwrap()
        .unwrap();
    assert_eq!(row.get("nickname"), Some("none"));
    assert!(row.is_null("last_name"));
}

#[test]
fn record_with_no_assigned_fields_inserts_defaults() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    person.save().unwrap();

    assert_eq!(person.id(), Some("1"));
}

#[test]
fn set_null_persists_null() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    person.set("nickname", "ace").unwrap();
    person.save().unwrap();

    person.set_null("nickname").unwrap();
    person.save().unwrap();

    let reloaded = ActiveRecord::load(&conn, "person", "1").unwrap();
    assert_eq!(reloaded.get("nickname").unwrap(), None);
}

#[test]
fn saving_a_missing_record_fails_with_not_found() {
    let conn = person_db();
    let mut ghost = ActiveRecord::load(&conn, "person", "404").unwrap();

    assert!(ghost.is_saved());
    assert!(!ghost.is_found());
    assert!(matches!(ghost.save().unwrap_err(), RecordError::NotFound(id) if id == "404"));
}

#[test]
fn unknown_table_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let err = ActiveRecord::new(&conn, "nope").unwrap_err();
    assert!(matches!(err, RecordError::UnknownTable(table) if table == "nope"));
}

#[test]
fn table_without_id_column_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    conn.exec("create table tag (name text primary key)", &[])
        .unwrap();

    let err = ActiveRecord::new(&conn, "tag").unwrap_err();
    assert!(matches!(err, RecordError::UnknownColumn { column, .. } if column == "id"));
}

#[test]
fn snapshot_serializes_fields_in_schema_order() {
    let conn = person_db();
    let mut person = ActiveRecord::new(&conn, "person").unwrap();
    person.set("firstName", "Ada").unwrap();
    person.save().unwrap();

    let json = serde_json::to_value(person.snapshot()).unwrap();
    assert_eq!(json["table"], "person");
    assert_eq!(json["id"], "1");
    assert_eq!(json["fields"]["first_name"], "Ada");
    assert!(json["fields"]["last_name"].is_null());

    let keys: Vec<&str> = json["fields"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 3);
}
