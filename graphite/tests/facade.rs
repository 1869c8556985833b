use graphite::prelude::*;

graphite::record! {
    struct Note {
        table: "notes",
        primary_key: "note_id",
        fields: { note_id: Integer, body: String }
    }
}

#[test]
fn test_prelude_exposes_data_layer() {
    let mut note = Note::default();
    note.set("body", "hello");
    assert!(note.is_dirty());
    assert_eq!(note.diff(), vec![("body", Value::from("hello"))]);

    let sql = graphite::graphite_data::build_select::<Note>(
        &FetchQuery::new().filter("note_id", 1),
        &graphite::graphite_data::escape_string,
    );
    assert!(sql.starts_with("SELECT t.`note_id`, t.`body`\nFROM `notes` t"));
}

#[test]
fn test_config_reexports() {
    let mut config = GraphiteConfig::empty();
    config.set("graphite.log.format", "json");
    assert_eq!(config.get::<String>("graphite.log.format").unwrap(), "json");
}
