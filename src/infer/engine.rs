//! Relationship inference over every pair of tables.

use crate::model::{Column, Relationship, Table};
use std::collections::BTreeMap;
use tracing::debug;

use super::candidate::{Match, Strategy, dedup};
use super::naming::{camel_reference, column_suffix, refers_to_table, snake_reference};

/// Relationship inference configuration.
#[derive(Debug, Clone)]
pub struct RelationshipInferrer {
    /// Link identically named columns even when neither is a primary key.
    pub link_unkeyed_exact_matches: bool,
}

impl Default for RelationshipInferrer {
    fn default() -> Self {
        Self {
            link_unkeyed_exact_matches: true,
        }
    }
}

/// Infer relationships with the default configuration.
pub fn infer_relationships(tables: &BTreeMap<String, Table>) -> Vec<Relationship> {
    RelationshipInferrer::default().infer(tables)
}

impl RelationshipInferrer {
    /// Inferred `1:N` relationships, one per linked column pair.
    pub fn infer(&self, tables: &BTreeMap<String, Table>) -> Vec<Relationship> {
        self.matches(tables)
            .iter()
            .map(Match::to_relationship)
            .collect()
    }

    /// Deduplicated matches with the strategy that won each link.
    ///
    /// Tables are compared pairwise in id order and every rule is applied in
    /// both directions, so the result does not depend on how the map was
    /// built.
    pub fn matches<'a>(&self, tables: &'a BTreeMap<String, Table>) -> Vec<Match<'a>> {
        let table_list: Vec<&Table> = tables.values().collect();
        let mut candidates = Vec::new();

        for i in 0..table_list.len() {
            for j in i + 1..table_list.len() {
                let (a, b) = (table_list[i], table_list[j]);
                for col_a in &a.columns {
                    for col_b in &b.columns {
                        self.match_columns(a, col_a, b, col_b, &mut candidates);
                    }
                }
            }
        }

        let kept = dedup(candidates);
        for m in &kept {
            debug!(
                from = %format!("{}.{}", m.from_table_id, m.from_column_id),
                to = %format!("{}.{}", m.to_table_id, m.to_column_id),
                strategy = ?m.strategy,
                "inferred relationship"
            );
        }
        kept
    }

    fn match_columns<'a>(
        &self,
        a: &'a Table,
        col_a: &'a Column,
        b: &'a Table,
        col_b: &'a Column,
        out: &mut Vec<Match<'a>>,
    ) {
        let start = out.len();
        let a_to_b = |strategy| link(a, col_a, b, col_b, strategy);
        let b_to_a = |strategy| link(b, col_b, a, col_a, strategy);

        // `user_id` in one table, key of `users` in the other.
        if references(col_a, snake_reference(&col_a.name), b, col_b) {
            out.push(b_to_a(Strategy::ForeignKeySuffix));
        }
        if references(col_b, snake_reference(&col_b.name), a, col_a) {
            out.push(a_to_b(Strategy::ForeignKeySuffix));
        }

        // Same name on both sides, oriented from the key.
        if col_a.name == col_b.name {
            match (col_a.is_primary_key, col_b.is_primary_key) {
                (true, false) => out.push(a_to_b(Strategy::ExactName)),
                (false, true) => out.push(b_to_a(Strategy::ExactName)),
                (false, false) if self.link_unkeyed_exact_matches => {
                    out.push(a_to_b(Strategy::ExactNameUnkeyed))
                }
                _ => {}
            }
        }

        // Shared suffix after a legacy prefix, skipped when this pair is
        // already linked.
        let suffix_a = column_suffix(&col_a.name).to_lowercase();
        let suffix_b = column_suffix(&col_b.name).to_lowercase();
        if suffix_a == suffix_b
            && suffix_a.chars().count() >= 2
            && col_a.name != col_b.name
            && out.len() == start
        {
            match (col_a.is_primary_key, col_b.is_primary_key) {
                (false, true) => out.push(b_to_a(Strategy::LegacySuffix)),
                _ => out.push(a_to_b(Strategy::LegacySuffix)),
            }
        }

        // `userId` in one table, key of `users` in the other.
        if references(col_a, camel_reference(&col_a.name), b, col_b) {
            out.push(b_to_a(Strategy::CamelCaseId));
        }
        if references(col_b, camel_reference(&col_b.name), a, col_a) {
            out.push(a_to_b(Strategy::CamelCaseId));
        }
    }
}

/// A non-key column whose reference token names `target`, paired with a key
/// column of `target`.
fn references(column: &Column, reference: Option<String>, target: &Table, target_column: &Column) -> bool {
    if column.is_primary_key || !target_column.is_primary_key {
        return false;
    }
    reference.is_some_and(|r| refers_to_table(&r, &target.name))
}

fn link<'a>(
    from: &'a Table,
    from_column: &'a Column,
    to: &'a Table,
    to_column: &'a Column,
    strategy: Strategy,
) -> Match<'a> {
    Match {
        from_table_id: &from.id,
        from_column_id: &from_column.id,
        to_table_id: &to.id,
        to_column_id: &to_column.id,
        strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;
    use std::collections::HashSet;

    fn col(id: &str, name: &str, pk: bool) -> Column {
        let c = Column::new(id, name, ColumnType::Text);
        if pk { c.primary_key() } else { c }
    }

    fn table(id: &str, name: &str, columns: Vec<Column>) -> Table {
        Table::new(id, name, columns)
    }

    fn map(tables: Vec<Table>) -> BTreeMap<String, Table> {
        tables.into_iter().map(|t| (t.id.clone(), t)).collect()
    }

    fn link_set(rels: &[Relationship]) -> HashSet<[String; 4]> {
        rels.iter()
            .map(|r| r.link_key().map(str::to_string))
            .collect()
    }

    fn users_orders() -> BTreeMap<String, Table> {
        map(vec![
            table("t_users", "users", vec![col("u_id", "id", true), col("u_name", "name", false)]),
            table(
                "t_orders",
                "orders",
                vec![
                    col("o_id", "id", true),
                    col("o_user", "user_id", false),
                    col("o_total", "total", false),
                ],
            ),
        ])
    }

    #[test]
    fn test_users_orders() {
        let tables = users_orders();
        let matches = RelationshipInferrer::default().matches(&tables);

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!((m.from_table_id, m.from_column_id), ("t_users", "u_id"));
        assert_eq!((m.to_table_id, m.to_column_id), ("t_orders", "o_user"));
        assert_eq!(m.strategy, Strategy::ForeignKeySuffix);

        let rels = infer_relationships(&tables);
        assert_eq!(rels.len(), 1);
        assert!(rels[0].inferred);
    }

    #[test]
    fn test_legacy_prefix() {
        let tables = map(vec![
            table("O0", "O0", vec![col("a", "O0BCTN", true)]),
            table("O1", "O1", vec![col("b", "O1BCTN", false)]),
        ]);
        let matches = RelationshipInferrer::default().matches(&tables);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, Strategy::LegacySuffix);
        assert_eq!((matches[0].from_table_id, matches[0].from_column_id), ("O0", "a"));
        assert_eq!((matches[0].to_table_id, matches[0].to_column_id), ("O1", "b"));
    }

    #[test]
    fn test_legacy_prefix_oriented_to_key() {
        // The key sits in the table visited second.
        let tables = map(vec![
            table("A", "A", vec![col("a", "PDDIV", false)]),
            table("B", "B", vec![col("b", "PBDIV", true)]),
        ]);
        let matches = RelationshipInferrer::default().matches(&tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].from_table_id, "B");
    }

    #[test]
    fn test_exact_name_from_key_side() {
        let tables = map(vec![
            table("a", "customer", vec![col("a1", "cust_no", false)]),
            table("b", "ledger", vec![col("b1", "cust_no", true)]),
        ]);
        let matches = RelationshipInferrer::default().matches(&tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, Strategy::ExactName);
        assert_eq!(matches[0].from_table_id, "b");
        assert_eq!(matches[0].to_table_id, "a");
    }

    #[test]
    fn test_exact_name_both_keys_not_linked() {
        let tables = map(vec![
            table("a", "alpha", vec![col("a1", "code", true)]),
            table("b", "beta", vec![col("b1", "code", true)]),
        ]);
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_unkeyed_exact_match_toggle() {
        let tables = map(vec![
            table("a", "alpha", vec![col("a0", "aid", true), col("a1", "region", false)]),
            table("b", "beta", vec![col("b0", "bid", true), col("b1", "region", false)]),
        ]);

        let matches = RelationshipInferrer::default().matches(&tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, Strategy::ExactNameUnkeyed);

        let strict = RelationshipInferrer {
            link_unkeyed_exact_matches: false,
        };
        assert!(strict.infer(&tables).is_empty());
    }

    #[test]
    fn test_camel_case_id() {
        let tables = map(vec![
            table("c", "Categories", vec![col("c0", "code", true)]),
            table("p", "product", vec![col("p0", "sku", true), col("p1", "categoryId", false)]),
        ]);
        let matches = RelationshipInferrer::default().matches(&tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, Strategy::CamelCaseId);
        assert_eq!((matches[0].from_table_id, matches[0].from_column_id), ("c", "c0"));
        assert_eq!((matches[0].to_table_id, matches[0].to_column_id), ("p", "p1"));
    }

    #[test]
    fn test_key_column_is_not_a_reference() {
        // `user_id` is itself the key of `sessions`, so it references nothing.
        let tables = map(vec![
            table("u", "users", vec![col("u0", "id", true)]),
            table("s", "sessions", vec![col("s0", "user_id", true)]),
        ]);
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_same_table_never_linked() {
        let tables = map(vec![table(
            "e",
            "employees",
            vec![col("e0", "id", true), col("e1", "employee_id", false)],
        )]);
        assert!(infer_relationships(&tables).is_empty());
    }

    #[test]
    fn test_higher_confidence_wins() {
        // Both the `_id` rule and the exact-name rule link these columns.
        let tables = map(vec![
            table("u", "user", vec![col("u0", "user_id", true)]),
            table("o", "orders", vec![col("o0", "oid", true), col("o1", "user_id", false)]),
        ]);
        let matches = RelationshipInferrer::default().matches(&tables);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].strategy, Strategy::ForeignKeySuffix);
        assert_eq!(matches[0].from_table_id, "u");
    }

    #[test]
    fn test_empty_input() {
        assert!(infer_relationships(&BTreeMap::new()).is_empty());
        let tables = map(vec![table("a", "a", vec![]), table("b", "b", vec![])]);
        assert!(infer_relationships(&tables).is_empty());
    }

    fn sample_schema(prefix: &str) -> Vec<Table> {
        vec![
            table(
                &format!("{prefix}1"),
                "users",
                vec![col("u0", "id", true), col("u1", "region", false), col("u2", "O0NAME", false)],
            ),
            table(
                &format!("{prefix}2"),
                "orders",
                vec![
                    col("o0", "id", true),
                    col("o1", "user_id", false),
                    col("o2", "region", false),
                    col("o3", "productId", false),
                ],
            ),
            table(
                &format!("{prefix}3"),
                "products",
                vec![col("p0", "id", true), col("p1", "O1NAME", false), col("p2", "region", false)],
            ),
        ]
    }

    #[test]
    fn test_deterministic() {
        let tables = map(sample_schema("t"));
        let first = infer_relationships(&tables);
        let second = infer_relationships(&tables);
        assert_eq!(link_set(&first), link_set(&second));

        let ends = |rels: &[Relationship]| -> Vec<(String, String)> {
            rels.iter()
                .map(|r| (r.from_column_id.clone(), r.to_column_id.clone()))
                .collect()
        };
        assert_eq!(ends(&first), ends(&second));
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let forward = map(sample_schema("t"));
        let mut reversed_tables = sample_schema("t");
        reversed_tables.reverse();
        let reversed = map(reversed_tables);
        assert_eq!(
            link_set(&infer_relationships(&forward)),
            link_set(&infer_relationships(&reversed))
        );
    }

    #[test]
    fn test_relabeled_ids_same_links() {
        // Same tables under ids that sort in the opposite order.
        let a = map(sample_schema("t"));
        let mut relabeled = sample_schema("z");
        for (t, id) in relabeled.iter_mut().zip(["z3", "z2", "z1"]) {
            t.id = id.to_string();
        }
        let b = map(relabeled);

        let names = |tables: &BTreeMap<String, Table>| -> HashSet<Vec<String>> {
            infer_relationships(tables)
                .iter()
                .map(|r| {
                    let mut ends = vec![
                        format!("{}.{}", tables[&r.from_table_id].name, r.from_column_id),
                        format!("{}.{}", tables[&r.to_table_id].name, r.to_column_id),
                    ];
                    ends.sort();
                    ends
                })
                .collect()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_no_duplicate_links() {
        let tables = map(sample_schema("t"));
        let rels = infer_relationships(&tables);
        assert_eq!(link_set(&rels).len(), rels.len());
        // users.id->orders.user_id, orders.productId, region x3, O0NAME/O1NAME
        assert_eq!(rels.len(), 6);
    }
}
