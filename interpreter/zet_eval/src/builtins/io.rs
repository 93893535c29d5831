//! Output functions.

use zet_ir::{Ident, Param};
use zet_rt::builtin::PreDefinedFunction;
use zet_rt::{EvalResult, PrintHandler, Value};

/// `print(value)`: write the value's unquoted form and a newline to the
/// host output channel, returning om.
pub struct PdPrint {
    params: Vec<Param>,
}

impl PdPrint {
    pub fn new() -> PdPrint {
        PdPrint {
            params: vec![Param::by_value(Ident::new("value"))],
        }
    }
}

impl PreDefinedFunction for PdPrint {
    fn name(&self) -> &'static str {
        "print"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        args: Vec<Value>,
        _write_back: &mut Vec<Value>,
        print: &dyn PrintHandler,
    ) -> EvalResult {
        print.write(&args[0].display_unquoted());
        print.write("\n");
        Ok(Value::Om)
    }
}
