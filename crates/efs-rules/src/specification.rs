//! Core Specification trait and combinators.

use async_trait::async_trait;
use std::sync::Arc;

/// An async predicate over an evaluation context.
///
/// Every link of the company-authorization chain is a specification over the
/// per-request [`RequestResourceCache`](crate::context::RequestResourceCache).
/// Implementations may hit the backend through the cache, so callers should
/// rely on the combinators' short-circuiting to avoid needless lookups.
#[async_trait]
pub trait Specification<Ctx>: Send + Sync {
    /// Check if the specification is satisfied by the given context.
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool;

    /// Name used in log fields.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Combine this specification with another using AND logic.
    fn and<S: Specification<Ctx>>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
    {
        And(self, other)
    }

    /// Combine this specification with another using OR logic.
    fn or<S: Specification<Ctx>>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    /// Negate this specification.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

/// AND combinator. The right side is not evaluated when the left is false.
#[derive(Clone)]
pub struct And<A, B>(pub A, pub B);

#[async_trait]
impl<Ctx, A, B> Specification<Ctx> for And<A, B>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
    B: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.0.is_satisfied_by(ctx).await && self.1.is_satisfied_by(ctx).await
    }
}

/// OR combinator. The right side is not evaluated when the left is true.
#[derive(Clone)]
pub struct Or<A, B>(pub A, pub B);

#[async_trait]
impl<Ctx, A, B> Specification<Ctx> for Or<A, B>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
    B: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.0.is_satisfied_by(ctx).await || self.1.is_satisfied_by(ctx).await
    }
}

/// NOT combinator.
#[derive(Clone)]
pub struct Not<A>(pub A);

#[async_trait]
impl<Ctx, A> Specification<Ctx> for Not<A>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        !self.0.is_satisfied_by(ctx).await
    }
}

/// A specification that always returns true.
#[derive(Clone, Copy)]
pub struct AlwaysTrue;

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for AlwaysTrue {
    async fn is_satisfied_by(&self, _ctx: &Ctx) -> bool {
        true
    }
}

/// A specification that always returns false.
#[derive(Clone, Copy)]
pub struct AlwaysFalse;

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for AlwaysFalse {
    async fn is_satisfied_by(&self, _ctx: &Ctx) -> bool {
        false
    }
}

/// A boxed specification for dynamic dispatch.
pub type BoxedSpec<Ctx> = Arc<dyn Specification<Ctx>>;

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for BoxedSpec<Ctx> {
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.as_ref().is_satisfied_by(ctx).await
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often it is evaluated.
    struct Counting {
        result: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Specification<()> for Counting {
        async fn is_satisfied_by(&self, _ctx: &()) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    #[tokio::test]
    async fn test_and_skips_right_side_when_left_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let rule = Specification::<()>::and(AlwaysFalse, Counting {
            result: true,
            calls: calls.clone(),
        });

        assert!(!rule.is_satisfied_by(&()).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_or_skips_right_side_when_left_holds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let rule = Specification::<()>::or(AlwaysTrue, Counting {
            result: false,
            calls: calls.clone(),
        });

        assert!(rule.is_satisfied_by(&()).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_and_boxed() {
        let boxed: BoxedSpec<()> = Arc::new(Specification::<()>::not(AlwaysFalse));
        assert!(boxed.is_satisfied_by(&()).await);
        assert!(boxed.name().contains("Not"));
    }
}
