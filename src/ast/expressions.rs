use std::{fmt, sync::Arc};

use crate::{
    ast::{BitwiseOperator, ComparisonOperator, Field, descriptors::join},
    value::Value,
};

/// A predicate over one field.
///
/// Simple comparisons (`=`, `!=`, `>`, `>=`, `<`, `<=`, `beginsWith`) carry a
/// single [`Value`]; `in` carries an ordered, possibly empty, list.
///
/// # Examples
/// ```text
/// id = "post1"
/// group in ("Admin", "Editor")
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison(Arc<ComparisonData>);

#[derive(Debug, Clone, PartialEq)]
struct ComparisonData {
    field: Field,
    operator: ComparisonOperator,
    operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Single(Value),
    List(Vec<Value>),
}

impl Comparison {
    /// Builds a comparison with an explicit operator. An `in` operator wraps
    /// `value` in a one-element list.
    pub fn new(field: impl Into<Field>, operator: ComparisonOperator, value: impl Into<Value>) -> Self {
        let value = value.into();
        let operand = match operator {
            ComparisonOperator::In => Operand::List(vec![value]),
            _ => Operand::Single(value),
        };
        Comparison(Arc::new(ComparisonData {
            field: field.into(),
            operator,
            operand,
        }))
    }

    pub fn eq(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::Equal, value)
    }

    pub fn ne(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::NotEqual, value)
    }

    pub fn gt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::GreaterThan, value)
    }

    pub fn gte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::GreaterThanOrEqual, value)
    }

    pub fn lt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::LesserThan, value)
    }

    pub fn lte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Comparison::new(field, ComparisonOperator::LesserThanOrEqual, value)
    }

    pub fn begins_with(field: impl Into<Field>, prefix: impl Into<String>) -> Self {
        Comparison::new(field, ComparisonOperator::BeginsWith, Value::String(prefix.into()))
    }

    pub fn is_in<I>(field: impl Into<Field>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Comparison(Arc::new(ComparisonData {
            field: field.into(),
            operator: ComparisonOperator::In,
            operand: Operand::List(values.into_iter().map(Into::into).collect()),
        }))
    }

    pub fn field(&self) -> &Field {
        &self.0.field
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.0.operator
    }

    /// The operand of a simple comparison; `None` for `in`.
    pub fn value(&self) -> Option<&Value> {
        match &self.0.operand {
            Operand::Single(value) => Some(value),
            Operand::List(_) => None,
        }
    }

    /// The operand list of an `in` comparison; `None` for simple comparisons.
    pub fn values(&self) -> Option<&[Value]> {
        match &self.0.operand {
            Operand::Single(_) => None,
            Operand::List(values) => Some(values),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.0.operand, Operand::List(_))
    }

    /// Replaces the operand of a simple comparison.
    ///
    /// Returns `self` when `value` equals the current operand. On an `in`
    /// comparison the list becomes `[value]`.
    pub fn set(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        match &self.0.operand {
            Operand::Single(current) if *current == value => self.clone(),
            Operand::Single(_) => self.update(Operand::Single(value)),
            Operand::List(_) => self.set_values([value]),
        }
    }

    /// Replaces the operand list of an `in` comparison.
    ///
    /// Returns `self` when the list is unchanged.
    pub fn set_values<I>(&self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        match &self.0.operand {
            Operand::List(current) if *current == values => self.clone(),
            _ => self.update(Operand::List(values)),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, operand: Operand) -> Self {
        Comparison(Arc::new(ComparisonData {
            field: self.0.field.clone(),
            operator: self.0.operator,
            operand,
        }))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.operand {
            Operand::Single(value) => write!(f, "{} {} {}", self.field(), self.operator(), value),
            Operand::List(values) => {
                write!(f, "{} {} ({})", self.field(), self.operator(), join(values, ", "))
            }
        }
    }
}

/// Operand of a [`Bitwise`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison(Comparison),
    Bitwise(Bitwise),
}

impl Expression {
    pub fn as_bitwise(&self) -> Option<&Bitwise> {
        match self {
            Expression::Bitwise(bitwise) => Some(bitwise),
            Expression::Comparison(_) => None,
        }
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Expression::Comparison(comparison) => Some(comparison),
            Expression::Bitwise(_) => None,
        }
    }

    /// Reference identity of the underlying node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Comparison(a), Expression::Comparison(b)) => a.ptr_eq(b),
            (Expression::Bitwise(a), Expression::Bitwise(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Comparison> for Expression {
    fn from(comparison: Comparison) -> Self {
        Expression::Comparison(comparison)
    }
}

impl From<Bitwise> for Expression {
    fn from(bitwise: Bitwise) -> Self {
        Expression::Bitwise(bitwise)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison(comparison) => comparison.fmt(f),
            Expression::Bitwise(bitwise) => bitwise.fmt(f),
        }
    }
}

/// Boolean combinator over comparisons and nested combinators.
///
/// Operand order carries no meaning for evaluation but is kept for
/// deterministic rendering and for [`remove`](Bitwise::remove) /
/// [`replace`](Bitwise::replace) matching.
///
/// # Examples
/// ```text
/// (id = "post1" and author = "mgrenier")
/// (a = 1 or (b = 2 and c = 3))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bitwise(Arc<BitwiseData>);

#[derive(Debug, Clone, PartialEq)]
struct BitwiseData {
    operator: BitwiseOperator,
    operands: Vec<Expression>,
}

impl Bitwise {
    pub fn new<I>(operator: BitwiseOperator, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        Bitwise(Arc::new(BitwiseData {
            operator,
            operands: operands.into_iter().map(Into::into).collect(),
        }))
    }

    /// A node with no operands.
    pub fn empty(operator: BitwiseOperator) -> Self {
        Bitwise(Arc::new(BitwiseData {
            operator,
            operands: Vec::new(),
        }))
    }

    pub fn and<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        Bitwise::new(BitwiseOperator::And, operands)
    }

    pub fn or<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        Bitwise::new(BitwiseOperator::Or, operands)
    }

    pub fn xor<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        Bitwise::new(BitwiseOperator::Xor, operands)
    }

    pub fn operator(&self) -> BitwiseOperator {
        self.0.operator
    }

    pub fn operands(&self) -> &[Expression] {
        &self.0.operands
    }

    /// True when no operand is itself a [`Bitwise`].
    pub fn is_leaf(&self) -> bool {
        !self
            .operands()
            .iter()
            .any(|op| matches!(op, Expression::Bitwise(_)))
    }

    /// Appends an operand.
    pub fn add(&self, expr: impl Into<Expression>) -> Self {
        let mut operands = self.0.operands.clone();
        operands.push(expr.into());
        self.with_operands(operands)
    }

    /// Removes the first operand equal to `expr`; returns `self` when absent.
    pub fn remove(&self, expr: &Expression) -> Self {
        match self.operands().iter().position(|op| op == expr) {
            Some(idx) => {
                let mut operands = self.0.operands.clone();
                operands.remove(idx);
                self.with_operands(operands)
            }
            None => self.clone(),
        }
    }

    /// Replaces every operand equal to `search` with `replacement`, recursing
    /// into nested groups when `deep` is set.
    ///
    /// The result is an [`Expression`]: when `self` is the search target the
    /// whole node is replaced, and the replacement may be a comparison. When
    /// nothing matched the result wraps `self` unchanged.
    pub fn replace(&self, search: &Expression, replacement: &Expression, deep: bool) -> Expression {
        if let Expression::Bitwise(target) = search
            && (target.ptr_eq(self) || target == self)
        {
            return replacement.clone();
        }

        let mut changed = false;
        let operands: Vec<Expression> = self
            .operands()
            .iter()
            .map(|op| {
                if op == search {
                    changed = true;
                    return replacement.clone();
                }
                if let (true, Expression::Bitwise(nested)) = (deep, op) {
                    let updated = nested.replace(search, replacement, true);
                    if !updated.ptr_eq(op) {
                        changed = true;
                        return updated;
                    }
                }
                op.clone()
            })
            .collect();

        if changed {
            Expression::Bitwise(self.with_operands(operands))
        } else {
            Expression::Bitwise(self.clone())
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn with_operands(&self, operands: Vec<Expression>) -> Self {
        Bitwise(Arc::new(BitwiseData {
            operator: self.0.operator,
            operands,
        }))
    }
}

impl fmt::Display for Bitwise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operands() {
            [] => Ok(()),
            [single] => single.fmt(f),
            operands => {
                let separator = format!(" {} ", self.operator());
                write!(f, "({})", join(operands, &separator))
            }
        }
    }
}
