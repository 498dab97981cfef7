// Generic stack and queue used by the postfix reducer and the evaluator

use std::collections::VecDeque;

/// LIFO stack backed by a Vec.
///
/// Removal is checked: `pop` returns `None` on an empty stack instead of
/// panicking, so invariant violations surface as errors to the caller.
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    /// Push a value onto the top of the stack.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Remove and return the top of the stack, if any.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Look at the top of the stack without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// FIFO queue backed by a VecDeque.
#[derive(Debug, Clone, Default)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Queue {
            items: VecDeque::new(),
        }
    }

    /// Add a value to the back of the queue.
    pub fn enqueue(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Remove and return the front of the queue, if any.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Consume the queue, yielding its items in front-to-back order.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}
