// geodispatch: fair route dispatch over a geofenced coordinate pool
// Copyright (C) 2026 geodispatch Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! An in-memory event source for tests and the CLI demo, standing in for a
//! database query in production.

use async_trait::async_trait;
use dispatch_types::{DispatchError, EventSource, PriorityEvent};
use tokio::sync::Mutex;

/// Holds a queue of events a test (or the demo CLI) can push into; `fetch`
/// drains and returns them.
#[derive(Debug, Default)]
pub struct InMemoryEventSource {
    pending: Mutex<Vec<PriorityEvent>>,
}

impl InMemoryEventSource {
    /// Create an empty event source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event to be returned by the next `fetch`.
    pub async fn push(&self, event: PriorityEvent) {
        self.pending.lock().await.push(event);
    }
}

#[async_trait]
impl EventSource for InMemoryEventSource {
    async fn fetch(&self) -> Result<Option<Vec<PriorityEvent>>, DispatchError> {
        let events = self.pending.lock().await.clone();
        Ok(Some(events))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dispatch_types::Location;

    #[tokio::test]
    async fn fetch_returns_pushed_events() {
        let source = InMemoryEventSource::new();
        source.push(PriorityEvent::new(1.0, Location::new(0.0, 0.0), 0)).await;
        let fetched = source.fetch().await.unwrap().unwrap();
        assert_eq!(fetched.len(), 1);
    }
}
