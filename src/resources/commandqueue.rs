//! Outgoing command queue.
//!
//! Commands are kept per controller in the order they were mapped. The
//! dispatcher takes the eligible prefix of each queue and leaves future-tick
//! commands in place.
use rustc_hash::FxHashMap;

use crate::events::command::{Command, ControllerId, Tick};

#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    queues: FxHashMap<ControllerId, Vec<Command>>,
}

impl CommandQueue {
    pub fn push(&mut self, command: Command) {
        self.queues.entry(command.controller).or_default().push(command);
    }

    /// Total commands waiting across all controllers.
    pub fn len(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(Vec::is_empty)
    }

    /// Controllers with pending commands, ascending.
    pub fn controllers(&self) -> Vec<ControllerId> {
        let mut ids: Vec<ControllerId> = self
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Pending commands of one controller.
    pub fn pending(&self, controller: ControllerId) -> &[Command] {
        self.queues
            .get(&controller)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remove and return the commands of `controller` that `current` is
    /// strictly later than, preserving their order. The rest stay queued.
    pub fn take_eligible(&mut self, controller: ControllerId, current: Tick) -> Vec<Command> {
        let Some(queue) = self.queues.get_mut(&controller) else {
            return Vec::new();
        };
        let (eligible, future): (Vec<Command>, Vec<Command>) = queue
            .drain(..)
            .partition(|command| current.is_later_than(command.tick));
        *queue = future;
        if queue.is_empty() {
            self.queues.remove(&controller);
        }
        eligible
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::command::{CommandValue, Intent};

    fn jump(controller: u32, tick: u32) -> Command {
        Command {
            controller: ControllerId(controller),
            intent: Intent::Jump,
            value: CommandValue::Bool(true),
            tick: Tick(tick),
        }
    }

    #[test]
    fn test_take_eligible_keeps_future_commands() {
        let mut queue = CommandQueue::default();
        queue.push(jump(0, 3));
        queue.push(jump(0, 5));
        queue.push(jump(0, 4));

        let taken = queue.take_eligible(ControllerId(0), Tick(5));
        assert_eq!(
            taken.iter().map(|c| c.tick).collect::<Vec<_>>(),
            vec![Tick(3), Tick(4)]
        );
        assert_eq!(queue.pending(ControllerId(0)), &[jump(0, 5)]);

        let taken = queue.take_eligible(ControllerId(0), Tick(6));
        assert_eq!(taken, vec![jump(0, 5)]);
        assert!(queue.is_empty());
        assert!(queue.controllers().is_empty());
    }

    #[test]
    fn test_controllers_sorted() {
        let mut queue = CommandQueue::default();
        queue.push(jump(7, 0));
        queue.push(jump(1, 0));
        queue.push(jump(3, 0));
        assert_eq!(
            queue.controllers(),
            vec![ControllerId(1), ControllerId(3), ControllerId(7)]
        );
        assert_eq!(queue.len(), 3);
        assert!(queue.take_eligible(ControllerId(9), Tick(1)).is_empty());
    }
}
