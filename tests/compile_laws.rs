//! Properties that hold for every dialect.

use sqlcraft::prelude::*;
use sqlcraft::transpiler::context::count_placeholders;

fn sample_queries() -> Vec<Query> {
    vec![
        Query::table("users as u")
            .select(["u.id", "u.name"])
            .left_join("orders as o", "o.user_id", "u.id")
            .where_eq("u.active", 1)
            .where_in("u.role", ["admin", "staff"])
            .where_between("u.age", 18, 65)
            .or()
            .where_group(|q| q.where_like("u.name", "a%").where_null("u.deleted_at"))
            .group_by(["u.id", "u.name"])
            .having("count", Operator::Gt, 2)
            .order_by_raw("CASE WHEN {u}.{tier} = ? THEN 0 ELSE 1 END", ["gold"])
            .limit(10)
            .offset(30),
        Query::table("users").offset(5),
        Query::table("users").limit(5),
        Query::table("v")
            .with_values("v", ["a", "b"], [[1, 2], [3, 4]])
            .where_eq("a", 1),
        Query::table("a")
            .select(["id"])
            .where_eq("x", 1)
            .union(Query::table("b").select(["id"]).where_eq("y", 2)),
        Query::table("users").where_eq("city", "Oslo").distinct().as_count(["city", "zip"]),
        Query::table("items").as_insert(["a", "b"], [[1, 2], [3, 4]]),
        Query::table("items").as_update([("a", 1), ("b", 2)]).where_eq("id", 3),
        Query::table("items").as_increment("stock", 4).where_eq("id", 3),
        Query::table("items").where_not_in("id", [1, 2, 3]).as_delete(),
        Query::table("t").where_raw(r"{data} \? 'key' AND {n} = ?", [5]),
    ]
}

fn compilers() -> Vec<Compiler> {
    let legacy = CompilerOptions::builder().legacy_pagination(true).build();
    Dialect::ALL
        .into_iter()
        .map(Compiler::new)
        .chain([
            Compiler::with_options(Dialect::SqlServer, legacy.clone()),
            Compiler::with_options(Dialect::Oracle, legacy),
        ])
        .collect()
}

#[test]
fn test_placeholders_match_bindings() {
    for compiler in compilers() {
        for query in sample_queries() {
            let result = compiler.compile(&query).unwrap();
            assert_eq!(
                count_placeholders(&result.raw_sql),
                result.bindings.len(),
                "{:?}: {}",
                compiler,
                result.raw_sql
            );
            assert_eq!(result.named_bindings.len(), result.bindings.len());
        }
    }
}

#[test]
fn test_compilation_is_repeatable() {
    for compiler in compilers() {
        for query in sample_queries() {
            let first = compiler.compile(&query).unwrap();
            let second = compiler.compile(&query).unwrap();
            assert_eq!(first, second, "{:?}", compiler);
        }
    }
}

#[test]
fn test_engine_scoped_clauses_are_isolated() {
    let plain = Query::table("t").where_eq("a", 1).limit(10);
    let scoped = plain
        .clone()
        .for_engine(Dialect::MySQL, |q| q.where_eq("b", 2).limit(3));

    for dialect in Dialect::ALL.into_iter().filter(|d| *d != Dialect::MySQL) {
        let compiler = Compiler::new(dialect);
        assert_eq!(
            compiler.compile(&scoped).unwrap(),
            compiler.compile(&plain).unwrap(),
            "{dialect}"
        );
    }

    let result = Compiler::new(Dialect::MySQL).compile(&scoped).unwrap();
    assert_eq!(result.sql, "SELECT * FROM `t` WHERE `a` = ? AND `b` = ? LIMIT ?");
    assert_eq!(result.bindings, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_empty_in_lists() {
    for dialect in Dialect::ALL {
        let compiler = Compiler::new(dialect);

        let none = compiler
            .compile(&Query::table("t").where_in("id", Vec::<i64>::new()))
            .unwrap();
        assert!(none.sql.ends_with("WHERE 1 = 0 /* IN [empty list] */"), "{dialect}");
        assert!(none.bindings.is_empty());

        let all = compiler
            .compile(&Query::table("t").where_not_in("id", Vec::<i64>::new()))
            .unwrap();
        assert!(all.sql.ends_with("WHERE 1 = 1 /* NOT IN [empty list] */"), "{dialect}");
        assert!(all.bindings.is_empty());
    }
}

#[test]
fn test_compiler_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();

    let compiler = std::sync::Arc::new(Compiler::new(Dialect::Postgres));
    let handles = (0..4)
        .map(|i| {
            let compiler = compiler.clone();
            std::thread::spawn(move || {
                compiler
                    .compile(&Query::table("t").where_eq("id", i))
                    .map(|r| r.bindings)
            })
        })
        .collect::<Vec<_>>();
    for (i, handle) in handles.into_iter().enumerate() {
        let bindings = handle.join().unwrap().unwrap();
        assert_eq!(bindings, vec![Value::Int(i as i64)]);
    }
}
