pub mod ast;
pub mod cli;
pub mod decode;
pub mod error;
pub mod guard;
pub mod output;
pub mod q;
pub mod simplify;
pub mod value;
pub mod visitor;

pub use ast::{
    AggregateQuery, AlterCollectionQuery, Bitwise, BitwiseOperator, CalcField, CalcFunction,
    CalcOperand, Collection, CollectionExistsQuery, CollectionRef, Column, ColumnType, Comparison,
    ComparisonOperator, CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery, Direction,
    DropCollectionQuery, Expression, Field, Filter, Index, IndexType, InsertQuery, Join, Operator,
    Query, ReplaceQuery, SelectQuery, Sort, SortableField, Target, UnionQuery, UpdateQuery,
};
pub use decode::{decode_expression, decode_query};
pub use error::QueryError;
pub use guard::QueryGuard;
pub use output::{to_text, to_text_pretty};
pub use simplify::{simplify_bitwise_tree, simplify_query};
pub use value::Value;
pub use visitor::{Node, Raw, Visitor, visit};
