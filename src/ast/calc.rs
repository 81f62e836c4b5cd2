use std::{fmt, sync::Arc};

use crate::ast::{CalcFunction, Field, descriptors::join};

/// Aggregate or scalar calculation over fields, composable with itself.
///
/// The function decides the arity: `count`, `avg`, `sum` and `sub` wrap a
/// single operand (and `count` only ever a plain field), `max`, `min` and
/// `concat` wrap an ordered list.
///
/// # Example
/// ```text
/// COUNT(id)
/// AVG(SUM(price))
/// CONCAT(first, last)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalcField {
    function: CalcFunction,
    operands: Arc<[CalcOperand]>,
}

/// Operand of a [`CalcField`]: a field or a nested calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcOperand {
    Field(Field),
    Calc(CalcField),
}

impl CalcField {
    pub fn count(field: impl Into<Field>) -> Self {
        CalcField::single(CalcFunction::Count, CalcOperand::Field(field.into()))
    }

    pub fn avg(operand: impl Into<CalcOperand>) -> Self {
        CalcField::single(CalcFunction::Average, operand.into())
    }

    pub fn sum(operand: impl Into<CalcOperand>) -> Self {
        CalcField::single(CalcFunction::Sum, operand.into())
    }

    pub fn sub(operand: impl Into<CalcOperand>) -> Self {
        CalcField::single(CalcFunction::Sub, operand.into())
    }

    pub fn max<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CalcOperand>,
    {
        CalcField::multiple(CalcFunction::Max, operands)
    }

    pub fn min<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CalcOperand>,
    {
        CalcField::multiple(CalcFunction::Min, operands)
    }

    pub fn concat<I>(operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CalcOperand>,
    {
        CalcField::multiple(CalcFunction::Concat, operands)
    }

    fn single(function: CalcFunction, operand: CalcOperand) -> Self {
        CalcField {
            function,
            operands: Arc::from([operand]),
        }
    }

    fn multiple<I>(function: CalcFunction, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CalcOperand>,
    {
        CalcField {
            function,
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn function(&self) -> CalcFunction {
        self.function
    }

    /// The wrapped operand of a single-operand function, `None` for
    /// `max`/`min`/`concat`.
    pub fn field(&self) -> Option<&CalcOperand> {
        if self.function.is_variadic() {
            return None;
        }
        self.operands.first()
    }

    /// Every operand in order; a single-operand function yields one.
    pub fn fields(&self) -> &[CalcOperand] {
        &self.operands
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.function == other.function && Arc::ptr_eq(&self.operands, &other.operands)
    }
}

impl From<Field> for CalcOperand {
    fn from(field: Field) -> Self {
        CalcOperand::Field(field)
    }
}

impl From<&str> for CalcOperand {
    fn from(name: &str) -> Self {
        CalcOperand::Field(Field::new(name))
    }
}

impl From<CalcField> for CalcOperand {
    fn from(calc: CalcField) -> Self {
        CalcOperand::Calc(calc)
    }
}

impl fmt::Display for CalcOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcOperand::Field(field) => field.fmt(f),
            CalcOperand::Calc(calc) => calc.fmt(f),
        }
    }
}

impl fmt::Display for CalcField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, join(&self.operands, ", "))
    }
}
