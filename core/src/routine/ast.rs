//! Routine body statement tree
//!
//! A routine body is a tree of statements over the persistent fields `S`,
//! with `Y` the type of yielded values. The tree only exists between the
//! builder and lowering; at run time the dispatch engine sees the flat
//! [`Program`](super::program::Program).

use std::fmt;

/// Ordinary sequential code between suspension points
pub type Action<S> = Box<dyn Fn(&mut S)>;

/// Computes the value handed to the caller at a suspension point
pub type Producer<S, Y> = Box<dyn Fn(&mut S) -> Y>;

/// Loop and branch condition
pub type Predicate<S> = Box<dyn Fn(&S) -> bool>;

/// Picks a select arm by index; out-of-range picks the fallback
pub type Selector<S> = Box<dyn Fn(&S) -> usize>;

/// Statement in a routine body
pub enum Stmt<S, Y> {
    Exec(Action<S>),
    Yield {
        label: &'static str,
        value: Producer<S, Y>,
    },
    If {
        test: Predicate<S>,
        then_s: Vec<Stmt<S, Y>>,
        else_s: Vec<Stmt<S, Y>>,
    },
    While {
        test: Predicate<S>,
        body: Vec<Stmt<S, Y>>,
    },
    Break,
    Continue,
    /// Multi-way branch. Arms may not suspend.
    Select {
        selector: Selector<S>,
        arms: Vec<Vec<Stmt<S, Y>>>,
        fallback: Vec<Stmt<S, Y>>,
    },
    /// Label that cancellation jumps to; what follows is cleanup
    Finish,
}

impl<S, Y> Stmt<S, Y> {
    /// Closure-free outline of this statement, used by validation
    pub fn shape(&self) -> Shape {
        match self {
            Stmt::Exec(_) => Shape::Exec,
            Stmt::Yield { label, .. } => Shape::Yield(*label),
            Stmt::If { then_s, else_s, .. } => Shape::If {
                then_s: shapes(then_s),
                else_s: shapes(else_s),
            },
            Stmt::While { body, .. } => Shape::While { body: shapes(body) },
            Stmt::Break => Shape::Break,
            Stmt::Continue => Shape::Continue,
            Stmt::Select { arms, fallback, .. } => Shape::Select {
                arms: arms.iter().map(|arm| shapes(arm)).collect(),
                fallback: shapes(fallback),
            },
            Stmt::Finish => Shape::Finish,
        }
    }
}

impl<S, Y> fmt::Debug for Stmt<S, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.shape().fmt(f)
    }
}

pub(crate) fn shapes<S, Y>(body: &[Stmt<S, Y>]) -> Vec<Shape> {
    body.iter().map(Stmt::shape).collect()
}

/// Structure of a statement without its closures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Exec,
    Yield(&'static str),
    If { then_s: Vec<Shape>, else_s: Vec<Shape> },
    While { body: Vec<Shape> },
    Break,
    Continue,
    Select { arms: Vec<Vec<Shape>>, fallback: Vec<Shape> },
    Finish,
}

impl Shape {
    /// Visit this shape and every shape nested inside it, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Shape)) {
        visit(self);
        match self {
            Shape::If { then_s, else_s } => {
                then_s.iter().for_each(|s| s.walk(visit));
                else_s.iter().for_each(|s| s.walk(visit));
            }
            Shape::While { body } => body.iter().for_each(|s| s.walk(visit)),
            Shape::Select { arms, fallback } => {
                arms.iter().flatten().for_each(|s| s.walk(visit));
                fallback.iter().for_each(|s| s.walk(visit));
            }
            Shape::Exec | Shape::Yield(_) | Shape::Break | Shape::Continue | Shape::Finish => {}
        }
    }
}
