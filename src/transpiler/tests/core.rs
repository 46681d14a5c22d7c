//! Statement shapes on the generic dialect.

use pretty_assertions::assert_eq;

use super::compile;
use crate::ast::*;
use crate::error::CraftError;
use crate::transpiler::{Compiler, Dialect};

#[test]
fn test_basic_select() {
    let query = Query::table("Users").select(["Id"]).filter("Age", Operator::Gt, 18);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.raw_sql, r#"SELECT "Id" FROM "Users" WHERE "Age" > ?"#);
    assert_eq!(result.sql, r#"SELECT "Id" FROM "Users" WHERE "Age" > @p0"#);
    assert_eq!(result.bindings, vec![Value::Int(18)]);
}

#[test]
fn test_select_star_and_distinct() {
    let result = compile(Dialect::Generic, &Query::table("users"));
    assert_eq!(result.sql, r#"SELECT * FROM "users""#);

    let result = compile(Dialect::Generic, &Query::table("users").select(["city"]).distinct());
    assert_eq!(result.sql, r#"SELECT DISTINCT "city" FROM "users""#);
}

#[test]
fn test_column_expansion_and_aliases() {
    let query = Query::table("users as u").select(["u.{id, name}", "email as mail"]);
    assert_eq!(
        compile(Dialect::Generic, &query).sql,
        r#"SELECT "u"."id", "u"."name", "email" AS "mail" FROM "users" AS "u""#
    );
}

#[test]
fn test_or_and_not_modifiers() {
    let query = Query::table("users")
        .where_eq("a", 1)
        .or_where_eq("b", 2)
        .not()
        .where_eq("c", 3);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.raw_sql,
        r#"SELECT * FROM "users" WHERE "a" = ? OR "b" = ? AND NOT ("c" = ?)"#
    );
    assert_eq!(result.bindings, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_null_and_boolean_conditions() {
    let query = Query::table("t")
        .where_null("deleted_at")
        .where_not_null("email")
        .where_true("active")
        .filter("archived", Operator::Ne, true)
        .filter("parent_id", Operator::Eq, Value::Null);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.sql,
        r#"SELECT * FROM "t" WHERE "deleted_at" IS NULL AND "email" IS NOT NULL AND "active" = true AND "archived" != true AND "parent_id" IS NULL"#
    );
    assert!(result.bindings.is_empty());
}

#[test]
fn test_between_and_in() {
    let query = Query::table("t")
        .where_between("age", 18, 30)
        .where_not_in("id", [1, 2]);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.raw_sql,
        r#"SELECT * FROM "t" WHERE "age" BETWEEN ? AND ? AND "id" NOT IN (?, ?)"#
    );
    assert_eq!(result.bindings.len(), 4);
}

#[test]
fn test_empty_in_list() {
    let query = Query::table("t").where_in("id", Vec::<i32>::new());
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.sql, r#"SELECT * FROM "t" WHERE 1 = 0 /* IN [empty list] */"#);
    assert!(result.bindings.is_empty());

    let query = Query::table("t").where_not_in("id", Vec::<i32>::new());
    assert_eq!(
        compile(Dialect::Generic, &query).sql,
        r#"SELECT * FROM "t" WHERE 1 = 1 /* NOT IN [empty list] */"#
    );
}

#[test]
fn test_nested_groups() {
    let query = Query::table("t")
        .where_eq("a", 1)
        .where_group(|q| q.where_eq("b", 2).or_where_eq("c", 3))
        .where_not_group(|q| q.where_eq("d", 4));
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.raw_sql,
        r#"SELECT * FROM "t" WHERE "a" = ? AND ("b" = ? OR "c" = ?) AND NOT ("d" = ?)"#
    );
    assert_eq!(
        result.bindings,
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
}

#[test]
fn test_empty_group_is_dropped() {
    let query = Query::table("t").or().where_group(|q| q).where_eq("a", 1);
    assert_eq!(compile(Dialect::Generic, &query).raw_sql, r#"SELECT * FROM "t" WHERE "a" = ?"#);
}

#[test]
fn test_joins() {
    let query = Query::table("users as u")
        .select(["u.id"])
        .join("orders as o", "u.id", "o.user_id")
        .left_join("profiles as p", "p.user_id", "u.id")
        .cross_join("regions");
    assert_eq!(
        compile(Dialect::Generic, &query).sql,
        r#"SELECT "u"."id" FROM "users" AS "u" INNER JOIN "orders" AS "o" ON "u"."id" = "o"."user_id" LEFT JOIN "profiles" AS "p" ON "p"."user_id" = "u"."id" CROSS JOIN "regions""#
    );
}

#[test]
fn test_join_with_bound_constraint() {
    let query = Query::table("users as u")
        .join_with(JoinKind::Left, "orders as o", |j| {
            j.on("o.user_id", "u.id").where_eq("o.status", "open")
        })
        .where_eq("u.active", 1);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.raw_sql,
        r#"SELECT * FROM "users" AS "u" LEFT JOIN "orders" AS "o" ON "o"."user_id" = "u"."id" AND "o"."status" = ? WHERE "u"."active" = ?"#
    );
    assert_eq!(result.bindings, vec![Value::from("open"), Value::Int(1)]);
}

#[test]
fn test_group_having_order() {
    let query = Query::table("orders")
        .select(["customer_id"])
        .group_by(["customer_id"])
        .having("total", Operator::Gt, 100)
        .order_by_desc("customer_id")
        .order_by("id");
    assert_eq!(
        compile(Dialect::Generic, &query).raw_sql,
        r#"SELECT "customer_id" FROM "orders" GROUP BY "customer_id" HAVING "total" > ? ORDER BY "customer_id" DESC, "id""#
    );
}

#[test]
fn test_limit_offset() {
    let result = compile(Dialect::Generic, &Query::table("t").limit(10).offset(20));
    assert_eq!(result.raw_sql, r#"SELECT * FROM "t" LIMIT ? OFFSET ?"#);
    assert_eq!(result.bindings, vec![Value::Int(10), Value::Int(20)]);

    let result = compile(Dialect::Generic, &Query::table("t").offset(5));
    assert_eq!(result.raw_sql, r#"SELECT * FROM "t" OFFSET ?"#);

    let result = compile(Dialect::Generic, &Query::table("t").for_page(3, 20));
    assert_eq!(result.bindings, vec![Value::Int(20), Value::Int(40)]);
}

#[test]
fn test_insert_single_row() {
    let query = Query::table("users").as_insert_row([("name", Value::from("ann")), ("age", Value::from(30))]);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.sql, r#"INSERT INTO "users" ("name", "age") VALUES (@p0, @p1)"#);
    assert_eq!(result.bindings, vec![Value::from("ann"), Value::Int(30)]);
}

#[test]
fn test_insert_many_rows() {
    let query = Query::table("t").as_insert(["a", "b"], [[1, 2], [3, 4]]);
    assert_eq!(
        compile(Dialect::Generic, &query).raw_sql,
        r#"INSERT INTO "t" ("a", "b") VALUES (?, ?), (?, ?)"#
    );
}

#[test]
fn test_insert_from_select() {
    let source = Query::table("users").select(["id"]).where_eq("active", false);
    let query = Query::table("archive").as_insert_query(["id"], source);
    assert_eq!(
        compile(Dialect::Generic, &query).sql,
        r#"INSERT INTO "archive" ("id") SELECT "id" FROM "users" WHERE "active" = false"#
    );
}

#[test]
fn test_update() {
    let query = Query::table("users").where_eq("id", 5).as_update([("name", "bob")]);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.raw_sql, r#"UPDATE "users" SET "name" = ? WHERE "id" = ?"#);
    assert_eq!(result.bindings, vec![Value::from("bob"), Value::Int(5)]);
}

#[test]
fn test_increment_and_decrement() {
    let result = compile(Dialect::Generic, &Query::table("items").as_increment("stock", 2));
    assert_eq!(result.raw_sql, r#"UPDATE "items" SET "stock" = "stock" + ?"#);

    let result = compile(Dialect::Generic, &Query::table("items").as_decrement("stock", 3));
    assert_eq!(result.raw_sql, r#"UPDATE "items" SET "stock" = "stock" - ?"#);
    assert_eq!(result.bindings, vec![Value::Int(3)]);
}

#[test]
fn test_delete() {
    let query = Query::table("users").as_delete().where_eq("id", 1);
    assert_eq!(
        compile(Dialect::Generic, &query).raw_sql,
        r#"DELETE FROM "users" WHERE "id" = ?"#
    );
}

#[test]
fn test_delete_with_join() {
    let query = Query::table("users as u")
        .join("bans as b", "b.user_id", "u.id")
        .as_delete()
        .where_eq("b.active", 1);
    assert_eq!(
        compile(Dialect::SqlServer, &query).sql,
        "DELETE [u] FROM [users] AS [u] INNER JOIN [bans] AS [b] ON [b].[user_id] = [u].[id] WHERE [b].[active] = @p0"
    );
}

#[test]
fn test_mutation_without_table() {
    let err = Compiler::new(Dialect::Generic)
        .compile(&Query::new().as_update([("a", 1)]))
        .unwrap_err();
    assert_eq!(err, CraftError::Structural("No table set to update".into()));
}

#[test]
fn test_sticky_builder_error() {
    let query = Query::table("t")
        .as_update_columns(["a", "b"], [1])
        .where_eq("x", 1);
    assert!(matches!(query.error(), Some(CraftError::Structural(_))));
    assert!(!query.has_component(Component::Where, None));

    let err = Compiler::new(Dialect::Postgres).compile(&query).unwrap_err();
    assert!(matches!(err, CraftError::Structural(_)));
}

#[test]
fn test_raw_fragments() {
    let query = Query::table("t")
        .select_raw("COUNT({id}) AS {n}", Vec::<Value>::new())
        .where_raw("{score} > ? AND {tag} IN (?)", [Value::from(5), Value::from(vec!["a", "b"])]);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.raw_sql,
        r#"SELECT COUNT("id") AS "n" FROM "t" WHERE "score" > ? AND "tag" IN (?, ?)"#
    );
    assert_eq!(result.bindings.len(), 3);
}

#[test]
fn test_raw_binding_mismatch() {
    let query = Query::table("t").where_raw("a = ? AND b = ?", [1]);
    let err = Compiler::new(Dialect::Generic).compile(&query).unwrap_err();
    assert!(matches!(err, CraftError::Structural(_)));
}

#[test]
fn test_escaped_placeholder() {
    let query = Query::table("docs")
        .where_raw(r"{data} \? 'key'", Vec::<Value>::new())
        .where_eq("id", 3);
    let result = compile(Dialect::Postgres, &query);
    assert_eq!(result.raw_sql, r#"SELECT * FROM "docs" WHERE "data" \? 'key' AND "id" = ?"#);
    assert_eq!(result.sql, r#"SELECT * FROM "docs" WHERE "data" ? 'key' AND "id" = @p0"#);
    assert_eq!(result.bindings, vec![Value::Int(3)]);
}

#[test]
fn test_literal_values_are_inlined() {
    let query = Query::table("t").filter("created_at", Operator::Lt, Value::literal("NOW()"));
    let result = compile(Dialect::Generic, &query);
    assert_eq!(result.sql, r#"SELECT * FROM "t" WHERE "created_at" < NOW()"#);
    assert!(result.bindings.is_empty());
}

#[test]
fn test_interpolated() {
    let query = Query::table("t").where_eq("name", "o'neil").limit(1);
    let result = compile(Dialect::Generic, &query);
    assert_eq!(
        result.interpolated(),
        r#"SELECT * FROM "t" WHERE "name" = 'o''neil' LIMIT 1"#
    );
}
