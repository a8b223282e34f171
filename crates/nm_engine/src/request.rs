//! Solve requests: the routed, backend-ready output of the pipeline.
//!
//! Each variant carries only what its operation needs. Expressions are in
//! canonical syntax (see `nm_parser::normalize`).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

impl Relation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Lt => "<",
            Relation::Le => "<=",
            Relation::Gt => ">",
            Relation::Ge => ">=",
            Relation::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Mean,
    Median,
    Mode,
    Variance,
    StdDev,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    Binomial {
        n: u64,
        p: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        k: Option<u64>,
    },
    Normal {
        mean: f64,
        std: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingKind {
    Permutation,
    Combination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixOpKind {
    Determinant,
    Eigenvalues,
    Eigenvectors,
    Inverse,
    Transpose,
    Rank,
    Trace,
    Rref,
    NullSpace,
    ColumnSpace,
    RowSpace,
    Multiply,
    SolveSystem,
}

impl MatrixOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixOpKind::Determinant => "determinant",
            MatrixOpKind::Eigenvalues => "eigenvalues",
            MatrixOpKind::Eigenvectors => "eigenvectors",
            MatrixOpKind::Inverse => "inverse",
            MatrixOpKind::Transpose => "transpose",
            MatrixOpKind::Rank => "rank",
            MatrixOpKind::Trace => "trace",
            MatrixOpKind::Rref => "rref",
            MatrixOpKind::NullSpace => "null_space",
            MatrixOpKind::ColumnSpace => "column_space",
            MatrixOpKind::RowSpace => "row_space",
            MatrixOpKind::Multiply => "multiply",
            MatrixOpKind::SolveSystem => "solve_system",
        }
    }
}

/// Matrix entries as canonical-syntax text, row-major.
pub type MatrixRows = Vec<Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SolveRequest {
    /// Solve `expr` (an equation, or an expression taken as `= 0`).
    EquationSolve {
        expr: String,
        target_var: Option<String>,
    },
    Inequality {
        lhs: String,
        relation: Relation,
        rhs: String,
        var: Option<String>,
    },
    Simplify {
        expr: String,
    },
    Factor {
        expr: String,
    },
    Derivative {
        expr: String,
        var: String,
    },
    IndefiniteIntegral {
        integrand: String,
        var: String,
    },
    /// `∫ u dv` with `u` the polynomial factor.
    IntegrationByParts {
        integrand: String,
        var: String,
        u: String,
        dv: String,
    },
    DefiniteIntegral {
        integrand: String,
        var: String,
        lower: String,
        upper: String,
    },
    Limit {
        expr: String,
        var: String,
        point: String,
    },
    Series {
        expr: String,
        var: String,
        point: String,
        order: u32,
    },
    TrigSimplify {
        expr: String,
    },
    TrigSolve {
        lhs: String,
        rhs: String,
    },
    StatSummary {
        kind: StatKind,
        data: Vec<f64>,
    },
    Distribution {
        distribution: Distribution,
    },
    Counting {
        kind: CountingKind,
        n: u64,
        r: u64,
    },
    MatrixOp {
        kind: MatrixOpKind,
        matrix: MatrixRows,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matrix2: Option<MatrixRows>,
    },
    PhysicsEquation {
        lhs: String,
        rhs: String,
        topic: String,
        target_var: Option<String>,
    },
}

impl SolveRequest {
    /// The serialized `op` tag.
    pub fn op_name(&self) -> &'static str {
        match self {
            SolveRequest::EquationSolve { .. } => "equation_solve",
            SolveRequest::Inequality { .. } => "inequality",
            SolveRequest::Simplify { .. } => "simplify",
            SolveRequest::Factor { .. } => "factor",
            SolveRequest::Derivative { .. } => "derivative",
            SolveRequest::IndefiniteIntegral { .. } => "indefinite_integral",
            SolveRequest::IntegrationByParts { .. } => "integration_by_parts",
            SolveRequest::DefiniteIntegral { .. } => "definite_integral",
            SolveRequest::Limit { .. } => "limit",
            SolveRequest::Series { .. } => "series",
            SolveRequest::TrigSimplify { .. } => "trig_simplify",
            SolveRequest::TrigSolve { .. } => "trig_solve",
            SolveRequest::StatSummary { .. } => "stat_summary",
            SolveRequest::Distribution { .. } => "distribution",
            SolveRequest::Counting { .. } => "counting",
            SolveRequest::MatrixOp { .. } => "matrix_op",
            SolveRequest::PhysicsEquation { .. } => "physics_equation",
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn fmt_matrix(rows: &MatrixRows) -> String {
    let inner: Vec<String> = rows.iter().map(|r| format!("[{}]", r.join(", "))).collect();
    format!("[{}]", inner.join(", "))
}

fn fmt_var(var: &Option<String>) -> &str {
    var.as_deref().unwrap_or("?")
}

impl fmt::Display for SolveRequest {
    /// One-line human rendering used by the CLI text output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveRequest::EquationSolve { expr, target_var } => {
                write!(f, "solve {expr} for {}", fmt_var(target_var))
            }
            SolveRequest::Inequality { lhs, relation, rhs, var } => {
                write!(f, "solve {lhs} {} {rhs} for {}", relation.symbol(), fmt_var(var))
            }
            SolveRequest::Simplify { expr } => write!(f, "simplify {expr}"),
            SolveRequest::Factor { expr } => write!(f, "factor {expr}"),
            SolveRequest::Derivative { expr, var } => write!(f, "d/d{var} {expr}"),
            SolveRequest::IndefiniteIntegral { integrand, var } => {
                write!(f, "integrate {integrand} d{var}")
            }
            SolveRequest::IntegrationByParts { integrand, var, u, dv } => {
                write!(f, "integrate {integrand} d{var} by parts: u = {u}, dv = {dv} d{var}")
            }
            SolveRequest::DefiniteIntegral { integrand, var, lower, upper } => {
                write!(f, "integrate {integrand} d{var} from {lower} to {upper}")
            }
            SolveRequest::Limit { expr, var, point } => write!(f, "limit {expr} as {var} -> {point}"),
            SolveRequest::Series { expr, var, point, order } => {
                write!(f, "series of {expr} in {var} around {point}, order {order}")
            }
            SolveRequest::TrigSimplify { expr } => write!(f, "simplify {expr}"),
            SolveRequest::TrigSolve { lhs, rhs } => write!(f, "solve {lhs} = {rhs}"),
            SolveRequest::StatSummary { kind, data } => write!(f, "{kind:?} of {data:?}"),
            SolveRequest::Distribution { distribution } => write!(f, "{distribution:?}"),
            SolveRequest::Counting { kind, n, r } => write!(f, "{kind:?}({n}, {r})"),
            SolveRequest::MatrixOp { kind, matrix, matrix2 } => {
                write!(f, "{} {}", kind.as_str(), fmt_matrix(matrix))?;
                if let Some(m2) = matrix2 {
                    write!(f, " {}", fmt_matrix(m2))?;
                }
                Ok(())
            }
            SolveRequest::PhysicsEquation { lhs, rhs, topic, target_var } => {
                write!(f, "{topic}: solve {lhs} = {rhs} for {}", fmt_var(target_var))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let req = SolveRequest::IndefiniteIntegral {
            integrand: "x**2".into(),
            var: "x".into(),
        };
        let v = req.to_json_value();
        assert_eq!(v["op"], "indefinite_integral");
        assert_eq!(v["integrand"], "x**2");
        assert_eq!(v["op"], req.op_name());
    }

    #[test]
    fn test_nested_distribution_tag() {
        let req = SolveRequest::Distribution {
            distribution: Distribution::Binomial { n: 10, p: 0.5, k: None },
        };
        let v = req.to_json_value();
        assert_eq!(v["op"], "distribution");
        assert_eq!(v["distribution"]["kind"], "binomial");
        assert!(v["distribution"].get("k").is_none());
    }

    #[test]
    fn test_display_ibp() {
        let req = SolveRequest::IntegrationByParts {
            integrand: "x*cos(x)".into(),
            var: "x".into(),
            u: "x".into(),
            dv: "cos(x)".into(),
        };
        assert_eq!(
            req.to_string(),
            "integrate x*cos(x) dx by parts: u = x, dv = cos(x) dx"
        );
    }

    #[test]
    fn test_matrix_op_skips_second_matrix() {
        let req = SolveRequest::MatrixOp {
            kind: MatrixOpKind::Determinant,
            matrix: vec![vec!["1".into()]],
            matrix2: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("matrix2"));
        assert_eq!(req.to_string(), "determinant [[1]]");
    }
}
