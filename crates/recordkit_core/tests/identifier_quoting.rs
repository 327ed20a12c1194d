use recordkit_core::sql::{quote_identifier, unquote_identifier};

#[test]
fn backtick_is_doubled() {
    assert_eq!(quote_identifier("a`b"), "`a``b`");
}

#[test]
fn quoting_round_trips_for_awkward_names() {
    let names = [
        "",
        "plain",
        "first_name",
        "`",
        "``",
        "a`b`c",
        "`leading",
        "trailing`",
        "with space",
        "quote'mark",
        "dbl\"quote",
        "back\\slash",
        "ünïcödé`名前",
    ];

    for name in names {
        let quoted = quote_identifier(name);
        assert!(quoted.starts_with('`') && quoted.ends_with('`'));
        assert_eq!(
            unquote_identifier(&quoted).as_deref(),
            Some(name),
            "round trip failed for {name:?}"
        );
    }
}
