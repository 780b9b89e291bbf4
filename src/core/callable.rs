//! Filter function values and the arity contract for custom filters
//!
//! A filter is a single-argument function. Custom filters are supplied as
//! closures, so the number of parameters they take is captured at the type
//! level by [`IntoCallable`] and checked at registration time.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A resolved filter: one value in, one value or a rejection message out
pub type FilterFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

type Invoke = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// A function value together with its declared signature
///
/// Only callables taking exactly one required parameter can be registered as
/// filters.
#[derive(Clone)]
pub struct Callable {
    params: usize,
    required: usize,
    invoke: Invoke,
}

impl Callable {
    /// Build a callable from a function over its argument list
    ///
    /// `params` is the total number of parameters, `required` how many of
    /// them must be supplied. Missing optional arguments are simply absent
    /// from the slice.
    pub fn from_args<F>(params: usize, required: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            params,
            required: required.min(params),
            invoke: Arc::new(f),
        }
    }

    pub fn params(&self) -> usize {
        self.params
    }

    pub fn required(&self) -> usize {
        self.required
    }

    /// Whether this callable satisfies the filter contract
    pub fn is_unary(&self) -> bool {
        self.params == 1 && self.required == 1
    }

    /// Call with an explicit argument list
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.invoke)(args)
    }

    /// Convert into a filter, or give the callable back if it is not unary
    pub fn into_filter(self) -> Result<FilterFn, Self> {
        if !self.is_unary() {
            return Err(self);
        }
        let invoke = self.invoke;
        Ok(Arc::new(move |value: Value| {
            invoke(std::slice::from_ref(&value))
        }))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("params", &self.params)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Conversion of closures into [`Callable`]s
///
/// The `Args` marker records the closure's parameter list, which is what
/// lets registration reject closures that take the wrong number of
/// arguments.
///
/// ```rust
/// use formsift::core::callable::IntoCallable;
/// use serde_json::Value;
///
/// let unary = (|v: Value| -> Result<Value, String> { Ok(v) }).into_callable();
/// assert!(unary.is_unary());
///
/// let binary = (|a: Value, _b: Value| -> Result<Value, String> { Ok(a) }).into_callable();
/// assert_eq!(binary.params(), 2);
/// ```
pub trait IntoCallable<Args> {
    fn into_callable(self) -> Callable;
}

impl IntoCallable<Callable> for Callable {
    fn into_callable(self) -> Callable {
        self
    }
}

impl<F> IntoCallable<()> for F
where
    F: Fn() -> Result<Value, String> + Send + Sync + 'static,
{
    fn into_callable(self) -> Callable {
        Callable::from_args(0, 0, move |_| self())
    }
}

impl<F> IntoCallable<(Value,)> for F
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
{
    fn into_callable(self) -> Callable {
        Callable::from_args(1, 1, move |args| {
            self(args.first().cloned().unwrap_or(Value::Null))
        })
    }
}

impl<F> IntoCallable<(Value, Value)> for F
where
    F: Fn(Value, Value) -> Result<Value, String> + Send + Sync + 'static,
{
    fn into_callable(self) -> Callable {
        Callable::from_args(2, 2, move |args| {
            let first = args.first().cloned().unwrap_or(Value::Null);
            let second = args.get(1).cloned().unwrap_or(Value::Null);
            self(first, second)
        })
    }
}
