//! Arithmetic tools
//!
//! Six binary operations exposed as individual tools so the model can
//! name the one it needs. Division and modulus by zero are undefined and
//! fail rather than returning infinities.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::tool::Tool;
use crate::error::{Error, Result};

/// The supported binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Power,
}

impl MathOp {
    pub const ALL: [MathOp; 6] = [
        MathOp::Add,
        MathOp::Subtract,
        MathOp::Multiply,
        MathOp::Divide,
        MathOp::Modulus,
        MathOp::Power,
    ];

    fn name(self) -> &'static str {
        match self {
            MathOp::Add => "add",
            MathOp::Subtract => "subtract",
            MathOp::Multiply => "multiply",
            MathOp::Divide => "divide",
            MathOp::Modulus => "modulus",
            MathOp::Power => "power",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MathOp::Add => "Add two numbers.",
            MathOp::Subtract => "Subtract the second number from the first.",
            MathOp::Multiply => "Multiply two numbers.",
            MathOp::Divide => "Divide the first number by the second.",
            MathOp::Modulus => "Remainder of dividing the first number by the second.",
            MathOp::Power => "Raise the first number to the power of the second.",
        }
    }

    fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            MathOp::Add => Ok(a + b),
            MathOp::Subtract => Ok(a - b),
            MathOp::Multiply => Ok(a * b),
            MathOp::Divide => {
                if b == 0.0 {
                    Err(Error::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }
            MathOp::Modulus => {
                if b == 0.0 {
                    Err(Error::DivisionByZero)
                } else {
                    Ok(a % b)
                }
            }
            MathOp::Power => Ok(a.powf(b)),
        }
    }
}

/// One arithmetic operation as an agent tool
pub struct MathTool {
    op: MathOp,
}

impl MathTool {
    pub fn new(op: MathOp) -> Self {
        Self { op }
    }
}

/// Render a result without a trailing `.0` for whole numbers, since
/// graded answers are compared textually.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn number_arg(args: &Value, key: &str) -> Result<f64> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::tool("math", format!("missing numeric argument '{}'", key)))
}

#[async_trait]
impl Tool for MathTool {
    fn name(&self) -> &str {
        self.op.name()
    }

    fn description(&self) -> &str {
        self.op.description()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": "First operand" },
                "b": { "type": "number", "description": "Second operand" }
            },
            "required": ["a", "b"]
        })
    }

    async fn call(&self, args: Value) -> Result<String> {
        let a = number_arg(&args, "a")?;
        let b = number_arg(&args, "b")?;
        let result = self.op.apply(a, b)?;
        Ok(format_number(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(op: MathOp, a: f64, b: f64) -> Result<String> {
        MathTool::new(op).call(json!({"a": a, "b": b})).await
    }

    #[tokio::test]
    async fn test_basic_operations() {
        assert_eq!(run(MathOp::Add, 2.0, 2.0).await.unwrap(), "4");
        assert_eq!(run(MathOp::Subtract, 10.0, 4.0).await.unwrap(), "6");
        assert_eq!(run(MathOp::Multiply, 6.0, 7.0).await.unwrap(), "42");
        assert_eq!(run(MathOp::Divide, 7.0, 2.0).await.unwrap(), "3.5");
        assert_eq!(run(MathOp::Modulus, 10.0, 3.0).await.unwrap(), "1");
        assert_eq!(run(MathOp::Power, 2.0, 10.0).await.unwrap(), "1024");
    }

    #[tokio::test]
    async fn test_division_by_zero() {
        let err = run(MathOp::Divide, 1.0, 0.0).await.unwrap_err();
        assert!(matches!(err, Error::DivisionByZero));

        let err = run(MathOp::Modulus, 1.0, 0.0).await.unwrap_err();
        assert!(matches!(err, Error::DivisionByZero));
    }

    #[tokio::test]
    async fn test_negative_and_fractional_power() {
        assert_eq!(run(MathOp::Power, 2.0, -1.0).await.unwrap(), "0.5");
        assert_eq!(run(MathOp::Power, 9.0, 0.5).await.unwrap(), "3");
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let tool = MathTool::new(MathOp::Add);
        let err = tool.call(json!({"a": 1.0})).await.unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn test_tool_names_match_operations() {
        let names: Vec<&str> = MathOp::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(
            names,
            vec!["add", "subtract", "multiply", "divide", "modulus", "power"]
        );
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(3.5), "3.5");
    }
}
