//! Predicate tree canonicalization.
//!
//! Boolean AND/OR/XOR chains are associative, so nested groups that share
//! their parent's operator can be spliced into the parent:
//!
//! ```text
//! (a and (b and (c and d)))   →   (a and b and c and d)
//! (a and (b or c))            →   (a and (b or c))
//! ```
//!
//! No other rewrite happens: no De Morgan, no constant folding, no
//! reordering. XOR chains flatten under the same rule.

use crate::ast::{Bitwise, Expression, Filter, Query, SelectQuery, UnionQuery};

/// Flattens every chain of same-operator groups in `node`.
///
/// Operand order is preserved left to right. A leaf node (no nested
/// groups) and any tree that is already flat come back as the same
/// handle.
///
/// ```
/// use querytree::{Bitwise, Comparison, Expression, simplify::simplify_bitwise_tree};
///
/// let a = Comparison::eq("a", 1);
/// let b = Comparison::eq("b", 2);
/// let c = Comparison::eq("c", 3);
///
/// let nested = Bitwise::and([Expression::from(a.clone()), Bitwise::and([b.clone(), c.clone()]).into()]);
/// let flat: Vec<Expression> = vec![a.into(), b.into(), c.into()];
///
/// assert_eq!(simplify_bitwise_tree(&nested), Bitwise::and(flat));
/// ```
pub fn simplify_bitwise_tree(node: &Bitwise) -> Bitwise {
    if node.is_leaf() {
        return node.clone();
    }

    let mut changed = false;
    let mut operands: Vec<Expression> = Vec::with_capacity(node.operands().len());

    for operand in node.operands() {
        match operand {
            Expression::Comparison(_) => operands.push(operand.clone()),
            Expression::Bitwise(nested) if nested.operator() == node.operator() => {
                // Already flat below, so splicing one level flattens the chain.
                let nested = simplify_bitwise_tree(nested);
                operands.extend(nested.operands().iter().cloned());
                changed = true;
            }
            Expression::Bitwise(nested) => {
                let simplified = simplify_bitwise_tree(nested);
                changed |= !simplified.ptr_eq(nested);
                operands.push(Expression::Bitwise(simplified));
            }
        }
    }

    if !changed {
        return node.clone();
    }
    Bitwise::new(node.operator(), operands)
}

/// Applies [`simplify_bitwise_tree`] to every predicate of a query: the
/// `WHERE` tree, join conditions and joined sub-queries, and union
/// branches. Returns the same handle when nothing changes.
pub fn simplify_query(query: &Query) -> Query {
    match query {
        Query::Select(select) => Query::Select(simplify_select(select)),
        Query::Union(union) => Query::Union(simplify_union(union)),
        Query::Aggregate(aggregate) => {
            let mut result = aggregate.clone();
            if let Some(predicate) = aggregate.get_filter() {
                result = result.filter(simplify_bitwise_tree(predicate));
            }
            if let Some(join) = aggregate.get_join() {
                for (alias, entry) in join {
                    let (sub, on) = (simplify_select(&entry.query), simplify_expression(&entry.on));
                    if !sub.ptr_eq(&entry.query) || !on.ptr_eq(&entry.on) {
                        result = result.join(alias, sub, on);
                    }
                }
            }
            Query::Aggregate(result)
        }
        Query::Update(update) => match update.get_filter() {
            Some(predicate) => Query::Update(update.filter(simplify_bitwise_tree(predicate))),
            None => query.clone(),
        },
        Query::Replace(replace) => match replace.get_filter() {
            Some(predicate) => Query::Replace(replace.filter(simplify_bitwise_tree(predicate))),
            None => query.clone(),
        },
        Query::Delete(delete) => match delete.get_filter() {
            Some(predicate) => Query::Delete(delete.filter(simplify_bitwise_tree(predicate))),
            None => query.clone(),
        },
        Query::Insert(_)
        | Query::CreateCollection(_)
        | Query::DescribeCollection(_)
        | Query::AlterCollection(_)
        | Query::CollectionExists(_)
        | Query::DropCollection(_) => query.clone(),
    }
}

fn simplify_expression(expr: &Expression) -> Expression {
    match expr {
        Expression::Bitwise(bitwise) => Expression::Bitwise(simplify_bitwise_tree(bitwise)),
        Expression::Comparison(_) => expr.clone(),
    }
}

fn simplify_select(select: &SelectQuery) -> SelectQuery {
    let mut result = select.clone();
    if let Some(predicate) = select.get_filter() {
        result = result.filter(simplify_bitwise_tree(predicate));
    }
    if let Some(join) = select.get_join() {
        for (alias, entry) in join {
            let (sub, on) = (simplify_select(&entry.query), simplify_expression(&entry.on));
            if !sub.ptr_eq(&entry.query) || !on.ptr_eq(&entry.on) {
                result = result.join(alias, sub, on);
            }
        }
    }
    result
}

fn simplify_union(union: &UnionQuery) -> UnionQuery {
    let Some(selects) = union.get_selects() else {
        return union.clone();
    };
    let simplified: Vec<SelectQuery> = selects.iter().map(simplify_select).collect();
    if simplified.iter().zip(selects).all(|(a, b)| a.ptr_eq(b)) {
        return union.clone();
    }
    union.select(simplified)
}
