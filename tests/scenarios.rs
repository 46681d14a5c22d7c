use pretty_assertions::assert_eq;
use sqlcraft::prelude::*;

fn compile(dialect: Dialect, query: &Query) -> SqlResult {
    Compiler::new(dialect).compile(query).expect("query should compile")
}

#[test]
fn test_generic_select() {
    let query = Query::table("Users").select(["Id"]).filter("Age", Operator::Gt, 18);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.raw_sql, r#"SELECT "Id" FROM "Users" WHERE "Age" > ?"#);
    assert_eq!(result.bindings, vec![Value::Int(18)]);
}

#[test]
fn test_mysql_limit_offset() {
    let result = compile(Dialect::MySQL, &Query::table("Table").limit(5).offset(20));
    assert_eq!(result.raw_sql, "SELECT * FROM `Table` LIMIT ? OFFSET ?");
    assert_eq!(result.bindings, vec![Value::Int(5), Value::Int(20)]);
}

#[test]
fn test_sqlserver_offset_fetch() {
    let result = compile(Dialect::SqlServer, &Query::table("Table").limit(5).offset(20));
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM [Table] ORDER BY (SELECT 0) OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
    assert_eq!(result.bindings, vec![Value::Int(20), Value::Int(5)]);
}

#[test]
fn test_legacy_oracle_offset() {
    let options = CompilerOptions::builder().legacy_pagination(true).build();
    let result = Compiler::with_options(Dialect::Oracle, options)
        .compile(&Query::table("Table").offset(20))
        .unwrap();
    assert!(result.raw_sql.contains("ROWNUM"));
    assert!(result.raw_sql.ends_with(r#"WHERE "row_num" > ?"#));
    assert_eq!(result.bindings, vec![Value::Int(20)]);
}

#[test]
fn test_oracle_multi_row_insert() {
    let query = Query::table("Tbl").as_insert(["a", "b"], [[1, 2], [3, 4], [5, 6]]);
    let result = compile(Dialect::Oracle, &query);
    assert_eq!(
        result.raw_sql,
        r#"INSERT ALL INTO "Tbl" ("a", "b") VALUES (?, ?) INTO "Tbl" ("a", "b") VALUES (?, ?) INTO "Tbl" ("a", "b") VALUES (?, ?) SELECT 1 FROM DUAL"#
    );
    assert_eq!(result.bindings.len(), 6);
}

#[test]
fn test_compiler_from_config() {
    let config = CompilerConfig::from_toml_str(
        r#"
        dialect = "postgres"
        parameter_prefix = "$"
        parameter_base = 1
        "#,
    )
    .unwrap();
    let compiler = Compiler::with_options(config.dialect().unwrap(), config.options);
    let result = compiler
        .compile(&Query::table("users").where_eq("id", 7).where_eq("org", 2))
        .unwrap();
    assert_eq!(result.sql, r#"SELECT * FROM "users" WHERE "id" = $1 AND "org" = $2"#);
}

#[test]
fn test_unknown_dialect_code() {
    let err = Compiler::from_code("access").unwrap_err();
    assert!(matches!(err, CraftError::Config(_)));

    let compiler = Compiler::try_from("sqlite").unwrap();
    assert_eq!(compiler.dialect(), Dialect::SQLite);
}
