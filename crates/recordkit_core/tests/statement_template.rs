use recordkit_core::sql::{render, render_checked, StatementTemplate, TemplateError};
use recordkit_core::{Args, Literal};

fn quote(value: &Literal) -> String {
    match value {
        Literal::Null => "null".to_string(),
        Literal::Text(text) => format!("'{}'", text.replace('\'', "''")),
    }
}

#[test]
fn placeholder_inside_string_literal_is_not_substituted() {
    let rendered = render(
        "select * from t where name = ? and note = 'has ? mark'",
        ["O'Brien"],
        quote,
    );

    assert_eq!(
        rendered,
        "select * from t where name = 'O''Brien' and note = 'has ? mark'"
    );
}

#[test]
fn consumes_exactly_the_applicable_placeholders_in_order() {
    let sql = "insert into t (a, b, c) values (?, '?', ?) -- \"?\" ?";
    let template = StatementTemplate::parse(sql);
    assert_eq!(template.placeholder_count(), 3);

    let mut seen = Vec::new();
    let rendered = template.render(
        &Args::from(["1", "2", "3", "4", "5"]),
        |value| {
            seen.push(value.clone());
            quote(value)
        },
    );

    assert_eq!(
        seen,
        vec![Literal::from("1"), Literal::from("2"), Literal::from("3")]
    );
    assert_eq!(
        rendered,
        "insert into t (a, b, c) values ('1', '?', '2') -- \"?\" '3'"
    );
}

#[test]
fn quoted_placeholders_survive_regardless_of_argument_count() {
    let sql = "select '?', \"?\", `?`, 'it''s ?', 'a\\'?'";
    for count in 0..4 {
        let args: Vec<&str> = vec!["x"; count];
        assert_eq!(render(sql, args, quote), sql);
    }
}

#[test]
fn missing_arguments_leave_placeholders_verbatim() {
    let rendered = render("update t set a = ?, b = ? where id = ?", ["x"], quote);
    assert_eq!(rendered, "update t set a = 'x', b = ? where id = ?");
}

#[test]
fn checked_render_rejects_missing_arguments() {
    let err = render_checked("select ? , ?", "only-one", quote).unwrap_err();
    assert_eq!(
        err,
        TemplateError::ArgumentCount {
            placeholders: 2,
            supplied: 1
        }
    );

    let ok = render_checked("select ? , '?'", "only-one", quote).unwrap();
    assert_eq!(ok, "select 'only-one' , '?'");
}

#[test]
fn null_arguments_use_the_quote_callback() {
    let rendered = render(
        "update t set a = ? where id = ?",
        vec![Literal::Null, Literal::from(7_i64)],
        quote,
    );
    assert_eq!(rendered, "update t set a = null where id = '7'");
}

#[test]
fn template_without_placeholders_is_unchanged() {
    let sql = "select count(*) from `weird``name`";
    assert_eq!(render(sql, (), quote), sql);
    assert_eq!(render_checked(sql, (), quote).unwrap(), sql);
}
