//! Binary thread-tree scheduler for per-block workers.
//!
//! Blocks `0..n` are laid out as an implicit binary tree: block `i` has
//! children `2i + 1` (left) and `2i + 2` (right). A node runs its block's
//! transform, then:
//!
//! - snapshots its dictionary and spawns the right child on a new thread,
//! - hands the live dictionary to the left child on its own thread,
//! - joins the right child before returning.
//!
//! The snapshot is taken before the left child touches the dictionary, so
//! both children start from exactly the state the parent left behind. The
//! scheduler is direction-agnostic: encode and decode both drive it with
//! their own dictionary type and transform, which guarantees the two sides
//! fork identically.

use std::io;
use std::thread;

use tracing::{debug, error};

use crate::dictionary::Dictionary;
use crate::{PzError, PzResult};

/// Left and right children of `block` in a tree of `n` blocks.
pub fn children(block: usize, n: usize) -> (Option<usize>, Option<usize>) {
    let left = 2 * block + 1;
    let right = left + 1;
    ((left < n).then_some(left), (right < n).then_some(right))
}

/// Parent of `block`, or `None` for the root.
pub fn parent(block: usize) -> Option<usize> {
    (block > 0).then(|| (block - 1) / 2)
}

/// Number of tree levels needed for `n` blocks: `ceil(log2(n + 1))`.
pub fn depth(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

/// All blocks in the subtree rooted at `block`, in breadth-first order.
pub fn subtree(block: usize, n: usize) -> Vec<usize> {
    let mut blocks = Vec::new();
    if block >= n {
        return blocks;
    }
    blocks.push(block);
    let mut i = 0;
    while i < blocks.len() {
        let (left, right) = children(blocks[i], n);
        blocks.extend(left);
        blocks.extend(right);
        i += 1;
    }
    blocks
}

/// Builds the thread for a block's worker.
pub type BuilderFn = fn(usize) -> io::Result<thread::Builder>;

fn named_builder(block: usize) -> io::Result<thread::Builder> {
    Ok(thread::Builder::new().name(thread_name(block)))
}

/// Per-run state shared read-only by every node of the tree.
pub struct TreeContext<'a, W, F> {
    blocks: &'a [W],
    transform: F,
    builder: BuilderFn,
}

impl<'a, W, F> TreeContext<'a, W, F> {
    pub fn new(blocks: &'a [W], transform: F) -> Self {
        TreeContext {
            blocks,
            transform,
            builder: named_builder,
        }
    }

    /// Replace the worker thread builder. A builder error is handled like a
    /// failed spawn: the subtree runs inline on the parent's thread.
    pub fn with_builder(mut self, builder: BuilderFn) -> Self {
        self.builder = builder;
        self
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
}

type NodeOutputs<T> = Vec<(usize, PzResult<T>)>;

/// Run `transform` over every block, forking `seed` down the thread tree.
///
/// `transform(block_index, block, dict)` must leave `dict` in the state the
/// block's children should inherit. Returns one result per block, in block
/// order. Blocks whose worker panicked, or whose ancestor failed, report
/// [`PzError::WorkerFailed`].
pub fn run<D, W, T, F>(blocks: &[W], seed: D, transform: F) -> Vec<PzResult<T>>
where
    D: Dictionary,
    W: Sync,
    T: Send,
    F: Fn(usize, &W, &mut D) -> PzResult<T> + Sync,
{
    run_context(&TreeContext::new(blocks, transform), seed)
}

/// [`run`] with an explicit context.
pub fn run_context<D, W, T, F>(ctx: &TreeContext<'_, W, F>, seed: D) -> Vec<PzResult<T>>
where
    D: Dictionary,
    W: Sync,
    T: Send,
    F: Fn(usize, &W, &mut D) -> PzResult<T> + Sync,
{
    let n = ctx.num_blocks();
    if n == 0 {
        return Vec::new();
    }

    let outputs = thread::scope(|scope| {
        let fallback = seed.snapshot();
        let spawned = (ctx.builder)(0)
            .and_then(|b| b.spawn_scoped(scope, move || run_node(ctx, 0, seed)));
        match spawned {
            Ok(handle) => handle.join().unwrap_or_else(|_| {
                error!(block = 0, "root worker panicked");
                Vec::new()
            }),
            Err(e) => {
                error!(block = 0, error = %e, "failed to spawn root worker; running inline");
                run_node(ctx, 0, fallback)
            }
        }
    });

    let mut slots: Vec<Option<PzResult<T>>> = (0..n).map(|_| None).collect();
    for (block, result) in outputs {
        slots[block] = Some(result);
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(block, slot)| slot.unwrap_or(Err(PzError::WorkerFailed { block })))
        .collect()
}

fn thread_name(block: usize) -> String {
    format!("pzw-block-{block}")
}

fn run_node<D, W, T, F>(ctx: &TreeContext<'_, W, F>, block: usize, mut dict: D) -> NodeOutputs<T>
where
    D: Dictionary,
    W: Sync,
    T: Send,
    F: Fn(usize, &W, &mut D) -> PzResult<T> + Sync,
{
    let n = ctx.num_blocks();
    let result = (ctx.transform)(block, &ctx.blocks[block], &mut dict);
    if let Err(e) = &result {
        error!(block, error = %e, "block transform failed; skipping its subtree");
        return vec![(block, result)];
    }
    let mut outputs = vec![(block, result)];
    debug!(block, next_code = dict.next_code(), "block done");

    let (left, right) = children(block, n);
    let Some(right) = right else {
        if let Some(left) = left {
            outputs.extend(run_node(ctx, left, dict));
        }
        return outputs;
    };

    thread::scope(|scope| {
        let fork = dict.snapshot();
        let spawned = (ctx.builder)(right)
            .and_then(|b| b.spawn_scoped(scope, move || run_node(ctx, right, fork)));
        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(block = right, error = %e, "failed to spawn worker; running inline");
                outputs.extend(run_node(ctx, right, dict.snapshot()));
                None
            }
        };

        if let Some(left) = left {
            outputs.extend(run_node(ctx, left, dict));
        }

        if let Some(handle) = handle {
            match handle.join() {
                Ok(sub) => outputs.extend(sub),
                Err(_) => {
                    error!(block = right, "worker panicked");
                    outputs.extend(
                        subtree(right, n)
                            .into_iter()
                            .map(|b| (b, Err(PzError::WorkerFailed { block: b }))),
                    );
                }
            }
        }
    });

    outputs
}
