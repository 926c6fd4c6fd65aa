//! Named functions: user-defined, composed and built-in
//!
//! A [`MathFunction`] is invoked by building an [`Expr::Apply`] node over
//! argument expressions. Functions can be composed (`g ∘ f`) when the output
//! dimension of `f` matches the arity of `g`, and differentiated per
//! parameter into new functions.

use super::{EvaluationType, Expr, Value};
use crate::context::ContextModel;
use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Function wrapper around expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MathFunction {
    /// User expression over named parameters
    Custom(CustomFunction),
    /// `outer ∘ inner`
    Composite(CompositeFunction),
    /// Built-in transcendental with hard-coded evaluation and derivative
    Default(DefaultFunction),
}

/// User-defined function `name(params) = body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFunction {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Expr,
}

impl CustomFunction {
    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in call order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Body expression
    pub fn body(&self) -> &Expr {
        &self.body
    }
}

/// Composition `outer(inner(args))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFunction {
    pub(crate) inner: Arc<MathFunction>,
    pub(crate) outer: Arc<MathFunction>,
}

impl CompositeFunction {
    /// The function applied first
    pub fn inner(&self) -> &MathFunction {
        &self.inner
    }

    /// The function applied to the inner result
    pub fn outer(&self) -> &MathFunction {
        &self.outer
    }
}

/// Built-in single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DefaultFunction {
    /// `e^u`
    Exp,
    /// Natural logarithm
    Ln,
    /// Logarithm to the given base
    Log(f64),
    /// Square root
    Sqrt,
    /// Root of the given degree
    Root(f64),
}

impl DefaultFunction {
    /// Parameter name used when a built-in is turned into a custom function
    pub const PARAM: &'static str = "u";

    /// Display name
    pub fn name(&self) -> String {
        match self {
            DefaultFunction::Exp => "exp".to_string(),
            DefaultFunction::Ln => "ln".to_string(),
            DefaultFunction::Log(base) => format!("log_{}", base),
            DefaultFunction::Sqrt => "sqrt".to_string(),
            DefaultFunction::Root(degree) => format!("root_{}", degree),
        }
    }

    /// Evaluate on a real argument
    #[inline]
    pub fn apply_real(&self, u: f64) -> f64 {
        match self {
            DefaultFunction::Exp => u.exp(),
            DefaultFunction::Ln => u.ln(),
            DefaultFunction::Log(base) => u.ln() / base.ln(),
            DefaultFunction::Sqrt => u.sqrt(),
            DefaultFunction::Root(degree) => u.powf(1.0 / degree),
        }
    }

    /// Derivative with respect to the argument, as an expression in `u`.
    ///
    /// Log and Root are rewritten through Ln and Power.
    pub fn derivative_at(&self, u: &Expr) -> Expr {
        match self {
            DefaultFunction::Exp => Expr::exp(u.clone()),
            DefaultFunction::Ln => Expr::number(1.0) / u.clone(),
            DefaultFunction::Log(base) => {
                Expr::number(1.0) / (u.clone() * Expr::ln(Expr::number(*base)))
            }
            DefaultFunction::Sqrt => {
                Expr::number(1.0) / (Expr::number(2.0) * Expr::sqrt(u.clone()))
            }
            DefaultFunction::Root(degree) => {
                let inv = Expr::number(1.0) / Expr::number(*degree);
                inv.clone() * u.clone().pow(inv - Expr::number(1.0))
            }
        }
    }

    /// Reject a logarithm base or root degree that has no function
    pub(crate) fn validate(&self) -> EvalResult<()> {
        match self {
            DefaultFunction::Log(base) if !(*base > 0.0) || *base == 1.0 => Err(
                EvalError::invalid(format!("logarithm base {} is not valid", base)),
            ),
            DefaultFunction::Root(degree) if *degree == 0.0 || degree.is_nan() => {
                Err(EvalError::invalid("root degree must be non-zero"))
            }
            _ => Ok(()),
        }
    }
}

impl MathFunction {
    /// User-defined function; parameter names must be distinct
    pub fn custom(name: impl Into<String>, params: &[&str], body: Expr) -> EvalResult<Self> {
        let name = name.into();
        let unique: BTreeSet<&str> = params.iter().copied().collect();
        if unique.len() != params.len() {
            return Err(EvalError::invalid(format!(
                "function `{}` repeats a parameter name",
                name
            )));
        }
        if params.is_empty() {
            return Err(EvalError::invalid(format!(
                "function `{}` needs at least one parameter",
                name
            )));
        }
        Ok(MathFunction::Custom(CustomFunction {
            name,
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }))
    }

    /// Function name
    pub fn name(&self) -> String {
        match self {
            MathFunction::Custom(f) => f.name.clone(),
            MathFunction::Composite(c) => format!("{}∘{}", c.outer.name(), c.inner.name()),
            MathFunction::Default(f) => f.name(),
        }
    }

    /// Parameter names in call order
    pub fn params(&self) -> Vec<String> {
        match self {
            MathFunction::Custom(f) => f.params.clone(),
            MathFunction::Composite(c) => c.inner.params(),
            MathFunction::Default(_) => vec![DefaultFunction::PARAM.to_string()],
        }
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        match self {
            MathFunction::Custom(f) => f.params.len(),
            MathFunction::Composite(c) => c.inner.arity(),
            MathFunction::Default(_) => 1,
        }
    }

    /// Number of components the function returns
    pub fn output_dimension(&self) -> usize {
        match self {
            MathFunction::Custom(f) => match &f.body {
                Expr::Vector(elements) => elements.len(),
                _ => 1,
            },
            MathFunction::Composite(c) => c.outer.output_dimension(),
            MathFunction::Default(_) => 1,
        }
    }

    pub(crate) fn collect_free_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            MathFunction::Custom(f) => {
                let mut body_vars = BTreeSet::new();
                f.body.collect_variables(&mut body_vars);
                out.extend(body_vars.into_iter().filter(|v| !f.params.contains(v)));
            }
            MathFunction::Composite(c) => {
                c.inner.collect_free_variables(out);
                c.outer.collect_free_variables(out);
            }
            MathFunction::Default(_) => {}
        }
    }

    /// Build `self(args)`; the argument count must match the arity
    pub fn apply(&self, args: Vec<Expr>) -> EvalResult<Expr> {
        if args.len() != self.arity() {
            return Err(EvalError::DimensionMismatch {
                left: args.len(),
                right: self.arity(),
            });
        }
        if let MathFunction::Default(f) = self {
            f.validate()?;
        }
        Ok(Expr::Apply {
            function: Arc::new(self.clone()),
            args,
        })
    }

    /// Invoke on argument expressions under `mode`
    pub fn call(
        &self,
        args: &[Expr],
        mode: EvaluationType,
        ctx: &mut ContextModel,
    ) -> EvalResult<Value> {
        self.apply(args.to_vec())?.evaluate(mode, ctx)
    }

    /// Invoke on real arguments in a fresh context
    pub fn call_real(&self, args: &[f64]) -> EvalResult<f64> {
        let args: Vec<Expr> = args.iter().copied().map(Expr::Number).collect();
        let mut ctx = ContextModel::new();
        self.call(&args, EvaluationType::Real, &mut ctx)?.as_real()
    }

    /// `outer ∘ self`: `outer` must take as many parameters as `self` returns
    pub fn compose(&self, outer: &MathFunction) -> EvalResult<MathFunction> {
        if outer.arity() != self.output_dimension() {
            return Err(EvalError::DimensionMismatch {
                left: self.output_dimension(),
                right: outer.arity(),
            });
        }
        Ok(MathFunction::Composite(CompositeFunction {
            inner: Arc::new(self.clone()),
            outer: Arc::new(outer.clone()),
        }))
    }

    /// The `index`-th output component as a scalar function
    pub fn component(&self, index: usize) -> EvalResult<MathFunction> {
        let dim = self.output_dimension();
        if index >= dim {
            return Err(EvalError::DimensionMismatch {
                left: index + 1,
                right: dim,
            });
        }
        match self {
            MathFunction::Custom(f) => match &f.body {
                Expr::Vector(elements) => Ok(MathFunction::Custom(CustomFunction {
                    name: format!("{}[{}]", f.name, index),
                    params: f.params.clone(),
                    body: elements[index].clone(),
                })),
                _ => Ok(self.clone()),
            },
            MathFunction::Composite(c) => Ok(MathFunction::Composite(CompositeFunction {
                inner: Arc::clone(&c.inner),
                outer: Arc::new(c.outer.component(index)?),
            })),
            MathFunction::Default(_) => Ok(self.clone()),
        }
    }

    /// Rewrite an application of this function into applications of its
    /// constituents. Only composites change; other functions apply directly.
    pub fn expand(&self, args: &[Expr]) -> EvalResult<Expr> {
        match self {
            MathFunction::Composite(c) => {
                let intermediate = (0..c.inner.output_dimension())
                    .map(|j| c.inner.component(j)?.apply(args.to_vec()))
                    .collect::<EvalResult<Vec<Expr>>>()?;
                c.outer.expand(&intermediate)
            }
            _ => self.apply(args.to_vec()),
        }
    }

    /// Equivalent user function over this function's parameters
    pub fn to_custom(&self) -> EvalResult<CustomFunction> {
        match self {
            MathFunction::Custom(f) => Ok(f.clone()),
            _ => {
                let params = self.params();
                let args: Vec<Expr> = params.iter().cloned().map(Expr::Variable).collect();
                let body = self.expand(&args)?;
                Ok(CustomFunction {
                    name: self.name(),
                    params,
                    body,
                })
            }
        }
    }

    /// Partial derivative with respect to parameter `index`
    pub fn partial(&self, index: usize) -> EvalResult<MathFunction> {
        let params = self.params();
        let Some(param) = params.get(index) else {
            return Err(EvalError::invalid(format!(
                "`{}` has no parameter {}",
                self.name(),
                index
            )));
        };
        let body = match self {
            MathFunction::Default(f) => f.derivative_at(&Expr::var(param.as_str())),
            _ => self.to_custom()?.body.derive(param)?,
        };
        Ok(MathFunction::Custom(CustomFunction {
            name: format!("∂{}/∂{}", self.name(), param),
            params,
            body,
        }))
    }

    /// All partial derivatives in parameter order
    pub fn gradient(&self) -> EvalResult<Vec<MathFunction>> {
        (0..self.arity()).map(|i| self.partial(i)).collect()
    }

    /// Simplify the function body
    pub fn simplified(&self) -> EvalResult<MathFunction> {
        match self {
            MathFunction::Custom(f) => Ok(MathFunction::Custom(CustomFunction {
                name: f.name.clone(),
                params: f.params.clone(),
                body: f.body.simplify()?,
            })),
            _ => Ok(self.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paraboloid() -> MathFunction {
        // f(a, b) = a*a + 3*b
        MathFunction::custom("f", &["a", "b"], Expr::var("a") * "a" + Expr::var("b") * 3u32)
            .unwrap()
    }

    #[test]
    fn test_call_real() {
        assert_eq!(paraboloid().call_real(&[2.0, 1.0]), Ok(7.0));
        assert_eq!(
            paraboloid().call_real(&[1.0]),
            Err(EvalError::DimensionMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn test_rejects_duplicate_params() {
        assert!(MathFunction::custom("g", &["a", "a"], Expr::var("a")).is_err());
        assert!(MathFunction::custom("g", &[], Expr::number(1.0)).is_err());
    }

    #[test]
    fn test_argument_capture_is_avoided() {
        // f(a, b) called as f(b, a) must swap, not alias
        let f = MathFunction::custom("f", &["a", "b"], Expr::var("a") - "b").unwrap();
        let mut ctx = ContextModel::new();
        ctx.bind("a", Expr::number(10.0));
        ctx.bind("b", Expr::number(4.0));
        let v = f
            .call(&[Expr::var("b"), Expr::var("a")], EvaluationType::Real, &mut ctx)
            .unwrap();
        assert_eq!(v, Value::Real(-6.0));
        // caller's bindings survive the call
        assert_eq!(ctx.get("a"), Ok(&Expr::number(10.0)));
    }

    #[test]
    fn test_partials() {
        let f = paraboloid();
        let da = f.partial(0).unwrap();
        let db = f.partial(1).unwrap();
        assert_eq!(da.call_real(&[2.5, 0.0]), Ok(5.0));
        assert_eq!(db.call_real(&[2.5, 0.0]), Ok(3.0));
        assert!(f.partial(2).is_err());
        assert_eq!(f.gradient().unwrap().len(), 2);
    }

    #[test]
    fn test_default_partials() {
        let ln = MathFunction::Default(DefaultFunction::Ln);
        let d = ln.partial(0).unwrap();
        assert_eq!(d.call_real(&[4.0]), Ok(0.25));

        let sqrt = MathFunction::Default(DefaultFunction::Sqrt);
        let d = sqrt.partial(0).unwrap().call_real(&[4.0]).unwrap();
        assert!((d - 0.25).abs() < 1e-12);

        let cube_root = MathFunction::Default(DefaultFunction::Root(3.0));
        let d = cube_root.partial(0).unwrap().call_real(&[8.0]).unwrap();
        assert!((d - 1.0 / 12.0).abs() < 1e-12);

        let log10 = MathFunction::Default(DefaultFunction::Log(10.0));
        let d = log10.partial(0).unwrap().call_real(&[5.0]).unwrap();
        assert!((d - 1.0 / (5.0 * 10f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_compose_scalar() {
        // sqrt(f(a, b))
        let sqrt = MathFunction::Default(DefaultFunction::Sqrt);
        let g = paraboloid().compose(&sqrt).unwrap();
        assert_eq!(g.arity(), 2);
        assert_eq!(g.call_real(&[4.0, 3.0]), Ok(5.0));

        // ∂/∂a sqrt(a² + 3b) = a / sqrt(a² + 3b)
        let d = g.partial(0).unwrap().call_real(&[4.0, 3.0]).unwrap();
        assert!((d - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_compose_vector_valued() {
        // h(s) = (s, 2s); norm2(p, q) = p*p + q*q; (norm2 ∘ h)(s) = 5 s²
        let h = MathFunction::custom(
            "h",
            &["s"],
            Expr::vector(vec![Expr::var("s"), Expr::var("s") * 2u32]),
        )
        .unwrap();
        let norm2 = MathFunction::custom("n", &["p", "q"], Expr::var("p") * "p" + Expr::var("q") * "q")
            .unwrap();
        assert_eq!(h.output_dimension(), 2);
        let composed = h.compose(&norm2).unwrap();
        assert_eq!(composed.call_real(&[3.0]), Ok(45.0));
        assert_eq!(composed.partial(0).unwrap().call_real(&[3.0]), Ok(30.0));

        let sqrt = MathFunction::Default(DefaultFunction::Sqrt);
        assert_eq!(
            h.compose(&sqrt),
            Err(EvalError::DimensionMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn test_invalid_default_parameters() {
        let bad_log = MathFunction::Default(DefaultFunction::Log(1.0));
        assert!(bad_log.apply(vec![Expr::var("x")]).is_err());
        let bad_root = MathFunction::Default(DefaultFunction::Root(0.0));
        assert!(bad_root.apply(vec![Expr::var("x")]).is_err());
    }
}
