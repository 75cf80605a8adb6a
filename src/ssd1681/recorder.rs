//! Transport fake that records everything the driver sends

use core::time::Duration;

use display_interface::DisplayError;

use crate::ssd1681::interface::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Command(u8),
    Data(u8),
    Wait(Duration),
    Reset,
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub ops: Vec<Op>,
    /// Report every data byte as failed (still recorded)
    pub fail_data: bool,
    /// Fail the reset line
    pub fail_reset: bool,
    /// Report busy waits as timed out
    pub stay_busy: bool,
}

impl Recorder {
    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Data bytes that followed the last occurrence of `command`
    pub fn data_after_last(&self, command: u8) -> Vec<u8> {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == Op::Command(command))
            .map_or(self.ops.len(), |i| i + 1);
        self.ops[start..]
            .iter()
            .map_while(|op| match op {
                Op::Data(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Transport for Recorder {
    fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn write_data(&mut self, data: u8) -> Result<(), DisplayError> {
        self.ops.push(Op::Data(data));
        if self.fail_data {
            Err(DisplayError::BusWriteError)
        } else {
            Ok(())
        }
    }

    fn wait_while_busy(&mut self, timeout: Duration) -> bool {
        self.ops.push(Op::Wait(timeout));
        !self.stay_busy
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        if self.fail_reset {
            return Err(DisplayError::RSError);
        }
        self.ops.push(Op::Reset);
        Ok(())
    }
}
