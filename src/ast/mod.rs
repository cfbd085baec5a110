/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Program` root and the `Stmt`/`Expr` sum types
/// - expressions: Definitions for the expression node kinds
/// - statements: Definitions for the statement node kinds
///
/// Every node renders itself back to source text through `Display`. The
/// rendering fully parenthesizes operators and can be parsed again.
pub mod ast;
pub mod expressions;
pub mod statements;
