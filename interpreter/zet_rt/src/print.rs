//! Host output channel.
//!
//! Everything the interpreter says - `print` output and unhandled error
//! reports - goes through a handler so hosts can redirect it. The buffer
//! handler is what the tests read.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives interpreter output.
pub trait PrintHandler {
    /// Write raw text; callers add their own newlines.
    fn write(&self, text: &str);
}

/// Shared handler handle.
pub type SharedPrintHandler = Rc<dyn PrintHandler>;

/// Writes to standard output.
pub struct StdoutPrintHandler;

impl PrintHandler for StdoutPrintHandler {
    fn write(&self, text: &str) {
        print!("{text}");
    }
}

/// Accumulates output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: RefCell<String>,
}

impl BufferPrintHandler {
    pub fn new() -> BufferPrintHandler {
        BufferPrintHandler::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl PrintHandler for BufferPrintHandler {
    fn write(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }
}

/// Fresh stdout handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Rc::new(StdoutPrintHandler)
}

/// Fresh buffer handler, returned concretely so callers can read it back.
pub fn buffer_handler() -> Rc<BufferPrintHandler> {
    Rc::new(BufferPrintHandler::new())
}
