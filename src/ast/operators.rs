use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,
    /// Lesser than (`<`)
    LesserThan,
    /// Lesser than or equal (`<=`)
    LesserThanOrEqual,
    /// String prefix match (`beginsWith`)
    BeginsWith,
    /// Membership in a value list (`in`)
    In,
}

impl ComparisonOperator {
    /// Textual form used in rendering and handed to visitors.
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LesserThan => "<",
            ComparisonOperator::LesserThanOrEqual => "<=",
            ComparisonOperator::BeginsWith => "beginsWith",
            ComparisonOperator::In => "in",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(ComparisonOperator::Equal),
            "!=" => Some(ComparisonOperator::NotEqual),
            ">" => Some(ComparisonOperator::GreaterThan),
            ">=" => Some(ComparisonOperator::GreaterThanOrEqual),
            "<" => Some(ComparisonOperator::LesserThan),
            "<=" => Some(ComparisonOperator::LesserThanOrEqual),
            "beginsWith" => Some(ComparisonOperator::BeginsWith),
            "in" => Some(ComparisonOperator::In),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinators joining the operands of a [`Bitwise`](crate::ast::Bitwise) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOperator {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
    /// Exclusive OR (`xor`)
    Xor,
}

impl BitwiseOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BitwiseOperator::And => "and",
            BitwiseOperator::Or => "or",
            BitwiseOperator::Xor => "xor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "and" => Some(BitwiseOperator::And),
            "or" => Some(BitwiseOperator::Or),
            "xor" => Some(BitwiseOperator::Xor),
            _ => None,
        }
    }
}

impl fmt::Display for BitwiseOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any operator that can appear in a predicate tree.
///
/// Backends use this to describe what they cannot translate
/// (see [`QueryGuard`](crate::guard::QueryGuard)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Comparison(ComparisonOperator),
    Bitwise(BitwiseOperator),
}

impl Operator {
    pub fn parse(s: &str) -> Option<Self> {
        BitwiseOperator::parse(s)
            .map(Operator::Bitwise)
            .or_else(|| ComparisonOperator::parse(s).map(Operator::Comparison))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Comparison(op) => op.fmt(f),
            Operator::Bitwise(op) => op.fmt(f),
        }
    }
}

/// Ordering intent of a [`SortableField`](crate::ast::SortableField).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage type of a [`Column`](crate::ast::Column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    Bit,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Blob,
    Date,
    DateTime,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Boolean => "Boolean",
            ColumnType::Bit => "Bit",
            ColumnType::UInt8 => "UInt8",
            ColumnType::UInt16 => "UInt16",
            ColumnType::UInt32 => "UInt32",
            ColumnType::UInt64 => "UInt64",
            ColumnType::Int8 => "Int8",
            ColumnType::Int16 => "Int16",
            ColumnType::Int32 => "Int32",
            ColumnType::Int64 => "Int64",
            ColumnType::Float32 => "Float32",
            ColumnType::Float64 => "Float64",
            ColumnType::Text => "Text",
            ColumnType::Blob => "Blob",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "DateTime",
        }
    }

    /// Case-insensitive lookup by name (`"int32"`, `"Int32"`, `"INT32"`).
    pub fn parse(s: &str) -> Option<Self> {
        const ALL: [ColumnType; 16] = [
            ColumnType::Boolean,
            ColumnType::Bit,
            ColumnType::UInt8,
            ColumnType::UInt16,
            ColumnType::UInt32,
            ColumnType::UInt64,
            ColumnType::Int8,
            ColumnType::Int16,
            ColumnType::Int32,
            ColumnType::Int64,
            ColumnType::Float32,
            ColumnType::Float64,
            ColumnType::Text,
            ColumnType::Blob,
            ColumnType::Date,
            ColumnType::DateTime,
        ];
        ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

/// Kind of an [`Index`](crate::ast::Index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    Index,
    Primary,
    Unique,
}

impl IndexType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "index" => Some(IndexType::Index),
            "primary" => Some(IndexType::Primary),
            "unique" => Some(IndexType::Unique),
            _ => None,
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndexType::Index => "INDEX",
            IndexType::Primary => "PRIMARY",
            IndexType::Unique => "UNIQUE",
        })
    }
}

/// Function applied by a [`CalcField`](crate::ast::CalcField).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcFunction {
    Count,
    Average,
    Sum,
    Sub,
    Max,
    Min,
    Concat,
}

impl CalcFunction {
    /// Lowercase function name (`count`, `avg`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            CalcFunction::Count => "count",
            CalcFunction::Average => "avg",
            CalcFunction::Sum => "sum",
            CalcFunction::Sub => "sub",
            CalcFunction::Max => "max",
            CalcFunction::Min => "min",
            CalcFunction::Concat => "concat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "count" => Some(CalcFunction::Count),
            "avg" => Some(CalcFunction::Average),
            "sum" => Some(CalcFunction::Sum),
            "sub" => Some(CalcFunction::Sub),
            "max" => Some(CalcFunction::Max),
            "min" => Some(CalcFunction::Min),
            "concat" => Some(CalcFunction::Concat),
            _ => None,
        }
    }

    /// `max`, `min` and `concat` take a list of operands; the others take exactly one.
    pub fn is_variadic(self) -> bool {
        matches!(self, CalcFunction::Max | CalcFunction::Min | CalcFunction::Concat)
    }
}

impl fmt::Display for CalcFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}
