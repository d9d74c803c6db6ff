//! Playback cursor over the record sequence

/// What happened when the cursor moved past a sent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Next record in the same pass
    Next,
    /// Wrapped to the first record; carries the new pass number
    Wrapped(u64),
    /// Last record sent and looping is off
    Finished,
}

/// Position of the next record to send.
///
/// Only [`advance`](Playback::advance) moves the cursor, and the feed loop
/// calls it only after a broadcast attempt, so idle periods never skip data.
#[derive(Debug, Clone)]
pub struct Playback {
    len: usize,
    cursor: usize,
    pass: u64,
    loop_replay: bool,
    finished: bool,
}

impl Playback {
    pub fn new(len: usize, loop_replay: bool) -> Self {
        Self {
            len,
            cursor: 0,
            pass: 1,
            loop_replay,
            finished: len == 0,
        }
    }

    /// Index of the record to send next, or `None` once replay is over.
    pub fn current(&self) -> Option<usize> {
        if self.finished {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pass number, starting at 1.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move past the current record.
    pub fn advance(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished;
        }

        self.cursor += 1;
        if self.cursor < self.len {
            return Advance::Next;
        }

        if self.loop_replay {
            self.cursor = 0;
            self.pass += 1;
            Advance::Wrapped(self.pass)
        } else {
            self.finished = true;
            Advance::Finished
        }
    }
}
