//! Dialect spelling: quotes, parameters, paging, literals, hints.

use pretty_assertions::assert_eq;

use super::{compile, compile_with};
use crate::ast::*;
use crate::config::CompilerOptions;
use crate::error::CraftError;
use crate::transpiler::{Compiler, Dialect};

fn legacy() -> CompilerOptions {
    CompilerOptions::builder().legacy_pagination(true).build()
}

#[test]
fn test_mysql_dialect() {
    let result = compile(Dialect::MySQL, &Query::table("Table").limit(5).offset(20));
    assert_eq!(result.sql, "SELECT * FROM `Table` LIMIT ? OFFSET ?");
    assert_eq!(result.bindings, vec![Value::Int(5), Value::Int(20)]);

    let result = compile(Dialect::MySQL, &Query::table("t").offset(20));
    assert_eq!(result.sql, "SELECT * FROM `t` LIMIT 18446744073709551615 OFFSET ?");
    assert_eq!(result.bindings, vec![Value::Int(20)]);
}

#[test]
fn test_sqlite_dialect() {
    let result = compile(Dialect::SQLite, &Query::table("t").offset(20).where_true("active"));
    assert_eq!(result.sql, r#"SELECT * FROM "t" WHERE "active" = 1 LIMIT -1 OFFSET ?"#);
}

#[test]
fn test_sqlserver_dialect() {
    let result = compile(Dialect::SqlServer, &Query::table("Table").limit(5).offset(20));
    assert_eq!(
        result.sql,
        "SELECT * FROM [Table] ORDER BY (SELECT 0) OFFSET @p0 ROWS FETCH NEXT @p1 ROWS ONLY"
    );
    assert_eq!(result.bindings, vec![Value::Int(20), Value::Int(5)]);

    let query = Query::table("t").order_by("id").offset(10);
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "SELECT * FROM [t] ORDER BY [id] OFFSET @p0 ROWS"
    );
}

#[test]
fn test_sqlserver_legacy_top() {
    let query = Query::table("users").select(["name"]).distinct().limit(10);
    let result = compile_with(Dialect::SqlServer, legacy(), &query);
    assert_eq!(result.sql, "SELECT DISTINCT TOP (@p0) [name] FROM [users]");
    assert_eq!(result.bindings, vec![Value::Int(10)]);
}

#[test]
fn test_sqlserver_legacy_row_number() {
    let query = Query::table("users").select(["id"]).order_by("id").limit(10).offset(20);
    let result = compile_with(Dialect::SqlServer, legacy(), &query);
    assert_eq!(
        result.sql,
        "SELECT * FROM (SELECT [id], ROW_NUMBER() OVER (ORDER BY [id]) AS [row_num] FROM [users]) AS [results_wrapper] WHERE [row_num] BETWEEN @p0 AND @p1"
    );
    assert_eq!(result.bindings, vec![Value::Int(21), Value::Int(30)]);

    let query = Query::table("users").offset(20);
    let result = compile_with(Dialect::SqlServer, legacy(), &query);
    assert_eq!(
        result.sql,
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] FROM [users]) AS [results_wrapper] WHERE [row_num] >= @p0"
    );
    assert_eq!(result.bindings, vec![Value::Int(21)]);
}

#[test]
fn test_row_number_keeps_where_bindings_first() {
    let query = Query::table("users")
        .where_eq("status", "active")
        .order_by_raw("CASE WHEN {tier} = ? THEN 0 ELSE 1 END", ["gold"])
        .limit(5)
        .offset(5);
    let result = compile_with(Dialect::SqlServer, legacy(), &query);
    assert_eq!(
        result.sql,
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY CASE WHEN [tier] = @p0 THEN 0 ELSE 1 END) AS [row_num] FROM [users] WHERE [status] = @p1) AS [results_wrapper] WHERE [row_num] BETWEEN @p2 AND @p3"
    );
    assert_eq!(
        result.bindings,
        vec![
            Value::from("gold"),
            Value::from("active"),
            Value::Int(6),
            Value::Int(10)
        ]
    );
}

#[test]
fn test_oracle_dialect() {
    let result = compile(Dialect::Oracle, &Query::table("t").limit(10).offset(5));
    assert_eq!(
        result.sql,
        r#"SELECT * FROM "t" ORDER BY (SELECT 0 FROM DUAL) OFFSET :p0 ROWS FETCH NEXT :p1 ROWS ONLY"#
    );

    let query = Query::table("users as u").select(["u.name as n"]).where_eq("u.id", 1);
    assert_eq!(
        compile(Dialect::Oracle, &query).sql,
        r#"SELECT "u"."name" "n" FROM "users" "u" WHERE "u"."id" = :p0"#
    );
}

#[test]
fn test_oracle_legacy_rownum() {
    let result = compile_with(Dialect::Oracle, legacy(), &Query::table("Table").offset(20));
    assert_eq!(
        result.raw_sql,
        r#"SELECT * FROM (SELECT "results_wrapper".*, ROWNUM "row_num" FROM (SELECT * FROM "Table") "results_wrapper") WHERE "row_num" > ?"#
    );
    assert_eq!(result.bindings, vec![Value::Int(20)]);

    let result = compile_with(Dialect::Oracle, legacy(), &Query::table("t").limit(10));
    assert_eq!(result.sql, r#"SELECT * FROM (SELECT * FROM "t") WHERE ROWNUM <= :p0"#);

    let result = compile_with(Dialect::Oracle, legacy(), &Query::table("t").limit(10).offset(20));
    assert_eq!(
        result.sql,
        r#"SELECT * FROM (SELECT "results_wrapper".*, ROWNUM "row_num" FROM (SELECT * FROM "t") "results_wrapper" WHERE ROWNUM <= :p0) WHERE "row_num" > :p1"#
    );
    assert_eq!(result.bindings, vec![Value::Int(30), Value::Int(20)]);
}

#[test]
fn test_paging_out_of_range() {
    let query = Query::table("t").limit(u64::MAX).offset(10);
    for compiler in [
        Compiler::with_options(Dialect::SqlServer, legacy()),
        Compiler::with_options(Dialect::Oracle, legacy()),
        Compiler::new(Dialect::Firebird),
    ] {
        let err = compiler.compile(&query).unwrap_err();
        assert!(matches!(err, CraftError::Structural(_)));
    }

    let query = Query::table("t").offset(u64::MAX);
    let err = Compiler::with_options(Dialect::SqlServer, legacy()).compile(&query).unwrap_err();
    assert!(matches!(err, CraftError::Structural(_)));

    let err = Compiler::new(Dialect::Generic)
        .compile(&Query::table("t").for_page(u64::MAX, 50))
        .unwrap_err();
    assert!(matches!(err, CraftError::Structural(_)));

    let result = compile(Dialect::Postgres, &Query::table("t").limit(u64::MAX).offset(10));
    assert_eq!(result.bindings, vec![Value::from(u64::MAX), Value::Int(10)]);
}

#[test]
fn test_oracle_insert_all() {
    let query = Query::table("Tbl").as_insert(["a", "b"], [[1, 2], [3, 4], [5, 6]]);
    let result = compile(Dialect::Oracle, &query);
    assert_eq!(
        result.raw_sql,
        r#"INSERT ALL INTO "Tbl" ("a", "b") VALUES (?, ?) INTO "Tbl" ("a", "b") VALUES (?, ?) INTO "Tbl" ("a", "b") VALUES (?, ?) SELECT 1 FROM DUAL"#
    );
    assert_eq!(
        result.bindings,
        (1..=6).map(Value::Int).collect::<Vec<_>>()
    );
}

#[test]
fn test_firebird_dialect() {
    let result = compile(Dialect::Firebird, &Query::table("users").limit(10));
    assert_eq!(result.sql, r#"SELECT FIRST @p0 * FROM "USERS""#);

    let result = compile(Dialect::Firebird, &Query::table("users").offset(10));
    assert_eq!(result.sql, r#"SELECT SKIP @p0 * FROM "USERS""#);

    let result = compile(Dialect::Firebird, &Query::table("users").limit(10).offset(20));
    assert_eq!(result.sql, r#"SELECT * FROM "USERS" ROWS @p0 TO @p1"#);
    assert_eq!(result.bindings, vec![Value::Int(21), Value::Int(30)]);

    let query = Query::table("t").as_insert(["a", "b"], [[1, 2], [3, 4]]);
    assert_eq!(
        compile(Dialect::Firebird, &query).sql,
        r#"INSERT INTO "T" ("A", "B") SELECT @p0, @p1 FROM RDB$DATABASE UNION ALL SELECT @p2, @p3 FROM RDB$DATABASE"#
    );
}

#[test]
fn test_boolean_literals() {
    let query = Query::table("t").where_true("active");
    assert_eq!(compile(Dialect::SqlServer, &query).sql, "SELECT * FROM [t] WHERE [active] = cast(1 as bit)");
    assert_eq!(compile(Dialect::Oracle, &query).sql, r#"SELECT * FROM "t" WHERE "active" = 1"#);
    assert_eq!(compile(Dialect::Postgres, &query).sql, r#"SELECT * FROM "t" WHERE "active" = true"#);
}

#[test]
fn test_random_order() {
    let query = Query::table("t").order_by_random(None);
    assert_eq!(compile(Dialect::MySQL, &query).sql, "SELECT * FROM `t` ORDER BY RAND()");
    assert_eq!(compile(Dialect::SqlServer, &query).sql, "SELECT * FROM [t] ORDER BY NEWID()");
    assert_eq!(compile(Dialect::Oracle, &query).sql, r#"SELECT * FROM "t" ORDER BY DBMS_RANDOM.VALUE"#);
    assert_eq!(compile(Dialect::Postgres, &query).sql, r#"SELECT * FROM "t" ORDER BY RANDOM()"#);
}

#[test]
fn test_string_matching() {
    let query = Query::table("users").where_starts("name", "Jo");
    let result = compile(Dialect::Postgres, &query);
    assert_eq!(result.sql, r#"SELECT * FROM "users" WHERE "name" ILIKE @p0"#);
    assert_eq!(result.bindings, vec![Value::from("Jo%")]);

    let result = compile(Dialect::MySQL, &query);
    assert_eq!(result.sql, "SELECT * FROM `users` WHERE LOWER(`name`) LIKE ?");
    assert_eq!(result.bindings, vec![Value::from("jo%")]);

    let query = Query::table("codes").where_string("code", StringMatch::Contains, "50!%", true, Some('!'));
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.sql, r#"SELECT * FROM "codes" WHERE "code" LIKE @p0 ESCAPE '!'"#);
    assert_eq!(result.bindings, vec![Value::from("%50!%%")]);

    let query = Query::table("users").where_not_like("email", "%@test.%");
    assert_eq!(
        compile(Dialect::SQLite, &query).sql,
        r#"SELECT * FROM "users" WHERE NOT (LOWER("email") LIKE ?)"#
    );
}

#[test]
fn test_date_conditions() {
    let query = Query::table("t").where_date("created_at", Operator::Eq, "2024-01-02");
    assert_eq!(compile(Dialect::Generic, &query).sql, r#"SELECT * FROM "t" WHERE DATE("created_at") = @p0"#);
    assert_eq!(compile(Dialect::Postgres, &query).sql, r#"SELECT * FROM "t" WHERE "created_at"::date = @p0"#);
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "SELECT * FROM [t] WHERE CAST([created_at] AS DATE) = @p0"
    );
    assert_eq!(
        compile(Dialect::SQLite, &query).sql,
        r#"SELECT * FROM "t" WHERE strftime('%Y-%m-%d', "created_at") = cast(? as text)"#
    );
    assert_eq!(
        compile(Dialect::Oracle, &query).sql,
        r#"SELECT * FROM "t" WHERE TO_CHAR("created_at", 'YY-MM-DD') = TO_CHAR(TO_DATE(:p0, 'YY-MM-DD'), 'YY-MM-DD')"#
    );
    assert_eq!(
        compile(Dialect::Firebird, &query).sql,
        r#"SELECT * FROM "T" WHERE CAST("CREATED_AT" as DATE) = @p0"#
    );

    let query = Query::table("t").where_time("opens_at", Operator::Gte, "10:30");
    assert_eq!(
        compile(Dialect::Oracle, &query).sql,
        r#"SELECT * FROM "t" WHERE TO_CHAR("opens_at", 'HH24:MI') >= TO_CHAR(TO_DATE(:p0, 'HH24:MI'), 'HH24:MI')"#
    );
}

#[test]
fn test_date_parts() {
    let query = Query::table("t").where_date_part(DatePart::Year, "created_at", Operator::Eq, 2024);
    assert_eq!(compile(Dialect::MySQL, &query).sql, "SELECT * FROM `t` WHERE YEAR(`created_at`) = ?");
    assert_eq!(
        compile(Dialect::Postgres, &query).sql,
        r#"SELECT * FROM "t" WHERE DATE_PART('YEAR', "created_at") = @p0"#
    );
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "SELECT * FROM [t] WHERE DATEPART(YEAR, [created_at]) = @p0"
    );
    assert_eq!(
        compile(Dialect::Oracle, &query).sql,
        r#"SELECT * FROM "t" WHERE EXTRACT(YEAR FROM "created_at") = :p0"#
    );
    assert_eq!(
        compile(Dialect::SQLite, &query).sql,
        r#"SELECT * FROM "t" WHERE strftime('%Y', "created_at") = cast(? as text)"#
    );
}

#[test]
fn test_row_locks() {
    let update = Query::table("t").where_eq("id", 1).lock_for_update();
    let share = Query::table("t").lock_for_share();

    assert_eq!(compile(Dialect::Postgres, &update).sql, r#"SELECT * FROM "t" WHERE "id" = @p0 FOR UPDATE"#);
    assert_eq!(compile(Dialect::Postgres, &share).sql, r#"SELECT * FROM "t" FOR SHARE"#);
    assert_eq!(compile(Dialect::MySQL, &share).sql, "SELECT * FROM `t` LOCK IN SHARE MODE");
    assert_eq!(
        compile(Dialect::SqlServer, &update).sql,
        "SELECT * FROM [t] WITH (UPDLOCK, ROWLOCK) WHERE [id] = @p0"
    );
    assert_eq!(compile(Dialect::SqlServer, &share).sql, "SELECT * FROM [t] WITH (HOLDLOCK, ROWLOCK)");
    assert_eq!(
        compile(Dialect::Firebird, &update).sql,
        r#"SELECT * FROM "T" WHERE "ID" = @p0 FOR UPDATE WITH LOCK"#
    );

    for (dialect, query) in [
        (Dialect::SQLite, &update),
        (Dialect::Oracle, &share),
        (Dialect::Firebird, &share),
    ] {
        let err = Compiler::new(dialect).compile(query).unwrap_err();
        assert!(matches!(err, CraftError::Unsupported(_)), "{dialect}: {err:?}");
    }
}

#[test]
fn test_sqlserver_no_lock() {
    let options = CompilerOptions::builder().no_lock(true).build();
    let query = Query::table("users as u").join("orders as o", "o.user_id", "u.id");
    assert_eq!(
        compile_with(Dialect::SqlServer, options.clone(), &query).sql,
        "SELECT * FROM [users] AS [u] WITH (NOLOCK) INNER JOIN [orders] AS [o] WITH (NOLOCK) ON [o].[user_id] = [u].[id]"
    );
    // Only SqlServer spells table hints.
    assert_eq!(
        compile_with(Dialect::Postgres, options, &query).sql,
        r#"SELECT * FROM "users" AS "u" INNER JOIN "orders" AS "o" ON "o"."user_id" = "u"."id""#
    );
}

#[test]
fn test_join_index_hints() {
    let query = Query::table("users as u").join_with(JoinKind::Inner, "orders as o", |j| {
        j.on("o.user_id", "u.id").use_index("idx_user")
    });
    assert_eq!(
        compile(Dialect::MySQL, &query).sql,
        "SELECT * FROM `users` AS `u` INNER JOIN `orders` AS `o` USE INDEX (`idx_user`) ON `o`.`user_id` = `u`.`id`"
    );
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "SELECT * FROM [users] AS [u] INNER JOIN [orders] AS [o] WITH (INDEX([idx_user])) ON [o].[user_id] = [u].[id]"
    );
    assert_eq!(
        compile(Dialect::Postgres, &query).sql,
        r#"SELECT * FROM "users" AS "u" INNER JOIN "orders" AS "o" ON "o"."user_id" = "u"."id""#
    );
}

#[test]
fn test_last_insert_id() {
    let query = Query::table("users").as_insert_get_id([("name", "x")]);
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "INSERT INTO [users] ([name]) VALUES (@p0);SELECT scope_identity() as Id"
    );
    assert_eq!(
        compile(Dialect::MySQL, &query).sql,
        "INSERT INTO `users` (`name`) VALUES (?);SELECT last_insert_id() as Id"
    );
    assert_eq!(
        compile(Dialect::Postgres, &query).sql,
        r#"INSERT INTO "users" ("name") VALUES (@p0);SELECT lastval() AS id"#
    );
    assert_eq!(
        compile(Dialect::SQLite, &query).sql,
        r#"INSERT INTO "users" ("name") VALUES (?);select last_insert_rowid() as id"#
    );

    let err = Compiler::new(Dialect::Generic).compile(&query).unwrap_err();
    assert!(matches!(err, CraftError::Unsupported(_)));
}

#[test]
fn test_filtered_aggregate_column() {
    let query = Query::table("orders")
        .select_aggregate_filtered(AggregateFunc::Count, "id as paid", |q| q.where_eq("status", "paid"));
    assert_eq!(
        compile(Dialect::Postgres, &query).sql,
        r#"SELECT COUNT("id") FILTER (WHERE "status" = @p0) AS "paid" FROM "orders""#
    );
    assert_eq!(
        compile(Dialect::MySQL, &query).sql,
        "SELECT COUNT(CASE WHEN `status` = ? THEN `id` END) AS `paid` FROM `orders`"
    );
}

#[test]
fn test_parameter_overrides() {
    let options = CompilerOptions::builder().parameter_prefix("$").parameter_base(1).build();
    let query = Query::table("t").where_eq("a", 1).where_eq("b", 2);
    let result = compile_with(Dialect::Postgres, options, &query);
    assert_eq!(result.sql, r#"SELECT * FROM "t" WHERE "a" = $1 AND "b" = $2"#);
    assert_eq!(result.named_bindings.keys().collect::<Vec<_>>(), vec!["$1", "$2"]);

    let options = CompilerOptions::builder().parameter_prefix("?").build();
    let result = compile_with(Dialect::SqlServer, options, &query);
    assert_eq!(result.sql, "SELECT * FROM [t] WHERE [a] = ? AND [b] = ?");
    assert_eq!(result.named_bindings.keys().collect::<Vec<_>>(), vec!["p0", "p1"]);
}

#[test]
fn test_table_prefix() {
    let options = CompilerOptions::builder().table_prefix("app_").build();
    let query = Query::table("users as u").join("roles as r", "r.id", "u.role_id");
    assert_eq!(
        compile_with(Dialect::Generic, options, &query).sql,
        r#"SELECT * FROM "app_users" AS "u" INNER JOIN "app_roles" AS "r" ON "r"."id" = "u"."role_id""#
    );
}
