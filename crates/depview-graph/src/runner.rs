use crate::geometry::Point;
use depview_core::NodeId;
use std::collections::HashMap;

/// An external layout algorithm that refines positions one step at a time.
pub trait IterativeLayout {
    /// Advance the algorithm by one iteration.
    fn step(&mut self);

    /// Whether the algorithm considers itself converged.
    fn done(&self) -> bool;

    fn position(&self, node: NodeId) -> Option<Point>;
}

/// Iterative algorithm plus the cost estimate shown while it runs.
pub struct IterativeRunner {
    layout: Box<dyn IterativeLayout>,
    cost: usize,
}

impl IterativeRunner {
    pub fn new(layout: Box<dyn IterativeLayout>, cost: usize) -> Self {
        Self { layout, cost }
    }
}

impl std::fmt::Debug for IterativeRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterativeRunner")
            .field("cost", &self.cost)
            .field("done", &self.layout.done())
            .finish()
    }
}

/// Uniform step/done driver over every kind of layout.
///
/// Callers loop `while !runner.layout_done() { runner.layout_step() }`. Only the
/// `Counted` variant bounds how long that loop can take.
#[derive(Debug)]
pub enum LayoutRunner {
    /// Positions were fully computed up front.
    Direct(HashMap<NodeId, Point>),
    /// Runs until the wrapped algorithm reports convergence.
    Iterative(IterativeRunner),
    /// Runs until convergence or until the step budget is spent, whichever is first.
    Counted {
        runner: IterativeRunner,
        budget: usize,
        remaining: usize,
    },
}

impl LayoutRunner {
    pub fn direct(positions: HashMap<NodeId, Point>) -> Self {
        LayoutRunner::Direct(positions)
    }

    pub fn iterative(layout: Box<dyn IterativeLayout>, cost: usize) -> Self {
        LayoutRunner::Iterative(IterativeRunner::new(layout, cost))
    }

    pub fn counted(layout: Box<dyn IterativeLayout>, cost: usize, budget: usize) -> Self {
        LayoutRunner::Counted {
            runner: IterativeRunner::new(layout, cost),
            budget,
            remaining: budget,
        }
    }

    /// Progress estimate in steps. Not used for termination.
    pub fn layout_cost(&self) -> usize {
        match self {
            LayoutRunner::Direct(_) => 0,
            LayoutRunner::Iterative(runner) => runner.cost,
            LayoutRunner::Counted { runner, budget, .. } => runner.cost.min(*budget),
        }
    }

    pub fn layout_step(&mut self) {
        match self {
            LayoutRunner::Direct(_) => {}
            LayoutRunner::Iterative(runner) => runner.layout.step(),
            LayoutRunner::Counted {
                runner,
                budget,
                remaining,
            } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    runner.layout.step();
                    if *remaining == 0 && !runner.layout.done() {
                        tracing::debug!("Step budget of {} spent before convergence", budget);
                    }
                }
            }
        }
    }

    pub fn layout_done(&self) -> bool {
        match self {
            LayoutRunner::Direct(_) => true,
            LayoutRunner::Iterative(runner) => runner.layout.done(),
            LayoutRunner::Counted {
                runner, remaining, ..
            } => *remaining == 0 || runner.layout.done(),
        }
    }

    /// Drive the step loop to the end and report how many steps it took.
    ///
    /// An `Iterative` runner over an algorithm that never converges never returns.
    pub fn run_to_completion(&mut self) -> usize {
        let mut steps = 0;
        while !self.layout_done() {
            self.layout_step();
            steps += 1;
        }
        tracing::debug!("Layout finished after {} steps", steps);
        steps
    }

    pub fn position(&self, node: NodeId) -> Option<Point> {
        match self {
            LayoutRunner::Direct(positions) => positions.get(&node).copied(),
            LayoutRunner::Iterative(runner) | LayoutRunner::Counted { runner, .. } => {
                runner.layout.position(node)
            }
        }
    }

    /// Value snapshot of the current positions of `nodes`; unplaced nodes are left out.
    pub fn positions(&self, nodes: &[NodeId]) -> HashMap<NodeId, Point> {
        nodes
            .iter()
            .filter_map(|&node| self.position(node).map(|point| (node, point)))
            .collect()
    }
}
