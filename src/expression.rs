//! Functions given as expression strings.
//!
//! An [`Expression`] parses a string such as `"x^2 + math::sin(y)"` with `evalexpr` once, and can
//! then be handed to any evaluator: it implements [`Evaluate`] when it has at most one variable
//! and [`ScalarField`] for any number of variables.
//!
//! # Example
//!
//! ```
//! use calculus_kit::prelude::*;
//!
//! let f = Expression::new("x^2 + 2*x").unwrap();
//! let df = Derivative::new(f);
//! assert!((df.at(1.0).unwrap() - 4.0).abs() < 1e-4);
//!
//! let g = Expression::new("x * y").unwrap();
//! let volume = DoubleIntegral::new(g).over(0.0, 1.0, 0.0, 1.0).unwrap();
//! assert!((volume - 0.25).abs() < 1e-2);
//! ```
//!
//! # Variable Handling
//!
//! Variables can be specified either:
//! - Automatically extracted and sorted alphabetically using `new()`
//! - Explicitly, in the order points are given, using `with_variables()`

use std::collections::HashSet;

use colored::Colorize;
use evalexpr::{
    build_operator_tree, ContextWithMutableVariables, DefaultNumericTypes, HashMapContext, Node,
    Operator, Value,
};
use itertools::Itertools;

use crate::errors::{EvaluationError, ExpressionError};
use crate::function::{finite, Evaluate, ScalarField};

/// A parsed mathematical expression with an ordered list of variables.
#[derive(Clone)]
pub struct Expression {
    expression_str: String,
    node: Node<DefaultNumericTypes>,
    variables: Vec<String>,
}

impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Expression".cyan(), self.expression_str)?;
        writeln!(f, "    {}: {:?}", "Variables".cyan(), self.variables)?;
        writeln!(f, "}}")
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.expression_str,
            self.variables.join(", ").cyan()
        )
    }
}

impl Expression {
    /// Parses `expression`, taking its variables in alphabetical order.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let f = Expression::new("2*x + y^2").unwrap();
    /// assert_eq!(f.variables(), ["x", "y"]);
    /// assert_eq!(f.evaluate_at(&[1.0, 2.0]).unwrap(), 6.0);
    /// ```
    pub fn new(expression: &str) -> Result<Self, ExpressionError> {
        let node = build_operator_tree::<DefaultNumericTypes>(expression)?;
        let variables = extract_symbols(&node);
        Ok(Self {
            expression_str: expression.to_string(),
            node,
            variables,
        })
    }

    /// Parses `expression` with the variables in the given order.
    ///
    /// Declared variables need not all appear in the expression, but every variable the
    /// expression reads must be declared.
    ///
    /// # Example
    /// ```
    /// # use calculus_kit::prelude::*;
    /// let f = Expression::with_variables("2*x + y^2", &["y", "x"]).unwrap();
    /// assert_eq!(f.evaluate_at(&[2.0, 1.0]).unwrap(), 6.0);
    /// ```
    pub fn with_variables(expression: &str, variables: &[&str]) -> Result<Self, ExpressionError> {
        let node = build_operator_tree::<DefaultNumericTypes>(expression)?;
        if let Some(missing) = extract_symbols(&node)
            .into_iter()
            .find(|symbol| !variables.contains(&symbol.as_str()))
        {
            return Err(ExpressionError::VariableNotFound(missing));
        }
        Ok(Self {
            expression_str: expression.to_string(),
            node,
            variables: variables.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn as_str(&self) -> &str {
        &self.expression_str
    }

    fn eval(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        let mut context = HashMapContext::<DefaultNumericTypes>::new();
        for (name, &value) in self.variables.iter().zip(point) {
            context
                .set_value(name.clone(), Value::Float(value))
                .map_err(|err| EvaluationError::raised(point, err))?;
        }
        let value = self
            .node
            .eval_number_with_context(&context)
            .map_err(|err| EvaluationError::raised(point, err))?;
        finite(value, point)
    }
}

impl Evaluate for Expression {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        match self.variables.len() {
            0 | 1 => self.eval(&[x]),
            n => Err(EvaluationError::DimensionMismatch {
                expected: n,
                got: 1,
            }),
        }
    }
}

impl ScalarField for Expression {
    fn arity(&self) -> Option<usize> {
        Some(self.variables.len())
    }

    fn evaluate_at(&self, point: &[f64]) -> Result<f64, EvaluationError> {
        if point.len() != self.variables.len() {
            return Err(EvaluationError::DimensionMismatch {
                expected: self.variables.len(),
                got: point.len(),
            });
        }
        self.eval(point)
    }
}

/// Extracts the variables read by an expression tree, sorted alphabetically.
///
/// # Example
/// ```
/// # use calculus_kit::expression::extract_symbols;
/// let node = evalexpr::build_operator_tree::<evalexpr::DefaultNumericTypes>("y + x * y").unwrap();
/// assert_eq!(extract_symbols(&node), vec!["x".to_string(), "y".to_string()]);
/// ```
pub fn extract_symbols(node: &Node<DefaultNumericTypes>) -> Vec<String> {
    let mut symbols = HashSet::new();
    extract_symbols_from_node(node, &mut symbols);
    symbols.into_iter().sorted().collect()
}

fn extract_symbols_from_node(node: &Node<DefaultNumericTypes>, symbols: &mut HashSet<String>) {
    match node.operator() {
        Operator::VariableIdentifierRead { identifier } => {
            symbols.insert(identifier.to_string());
        }
        _ => {
            for child in node.children() {
                extract_symbols_from_node(child, symbols);
            }
        }
    }
}
