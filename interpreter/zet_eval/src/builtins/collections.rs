//! Collection reducers.
//!
//! `from`, `fromB`, and `fromE` take their collection read-write: they
//! remove a member and write the reduced collection back into the caller's
//! l-value. `arb` only peeks.

use zet_ir::{Ident, Param};
use zet_rt::builtin::PreDefinedFunction;
use zet_rt::errors::incompatible_type;
use zet_rt::{EvalResult, PrintHandler, Value};

fn rw_collection_params() -> Vec<Param> {
    vec![Param::read_write(Ident::new("collectionValue"))]
}

fn collection_size(collection: &Value) -> EvalResult<usize> {
    collection
        .size()
        .map_err(|_| incompatible_type(format!("argument '{collection}' is not a collection value")))
}

/// `from(rw collectionValue)`: select and remove an arbitrary member.
pub struct PdFrom {
    params: Vec<Param>,
}

impl PdFrom {
    pub fn new() -> PdFrom {
        PdFrom {
            params: rw_collection_params(),
        }
    }
}

impl PreDefinedFunction for PdFrom {
    fn name(&self) -> &'static str {
        "from"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        mut args: Vec<Value>,
        write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        let mut collection = args.remove(0);
        let size = collection_size(&collection)?;
        // Alternate ends so repeated draws do not degenerate into a queue.
        let element = if size % 2 == 0 {
            collection.remove_first()?
        } else {
            collection.remove_last()?
        };
        write_back.push(collection);
        Ok(element)
    }
}

/// `fromB(rw collectionValue)`: remove the first member.
pub struct PdFromB {
    params: Vec<Param>,
}

impl PdFromB {
    pub fn new() -> PdFromB {
        PdFromB {
            params: rw_collection_params(),
        }
    }
}

impl PreDefinedFunction for PdFromB {
    fn name(&self) -> &'static str {
        "fromB"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        mut args: Vec<Value>,
        write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        let mut collection = args.remove(0);
        collection_size(&collection)?;
        let element = collection.remove_first()?;
        write_back.push(collection);
        Ok(element)
    }
}

/// `fromE(rw collectionValue)`: remove the last member.
pub struct PdFromE {
    params: Vec<Param>,
}

impl PdFromE {
    pub fn new() -> PdFromE {
        PdFromE {
            params: rw_collection_params(),
        }
    }
}

impl PreDefinedFunction for PdFromE {
    fn name(&self) -> &'static str {
        "fromE"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        mut args: Vec<Value>,
        write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        let mut collection = args.remove(0);
        collection_size(&collection)?;
        let element = collection.remove_last()?;
        write_back.push(collection);
        Ok(element)
    }
}

/// `arb(collectionValue)`: an arbitrary member, collection untouched.
pub struct PdArb {
    params: Vec<Param>,
}

impl PdArb {
    pub fn new() -> PdArb {
        PdArb {
            params: vec![Param::by_value(Ident::new("collectionValue"))],
        }
    }
}

impl PreDefinedFunction for PdArb {
    fn name(&self) -> &'static str {
        "arb"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        mut args: Vec<Value>,
        _write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        // The argument is already this call's own clone; reducing it in
        // place is a cheap way to pick an end member.
        let mut collection = args.remove(0);
        let size = collection_size(&collection)?;
        if size % 2 == 0 {
            collection.remove_first()
        } else {
            collection.remove_last()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zet_rt::print::StdoutPrintHandler;

    fn run(
        f: &dyn PreDefinedFunction,
        args: Vec<Value>,
    ) -> (EvalResult, Vec<Value>) {
        let mut write_back = Vec::new();
        let result = f.execute(args, &mut write_back, &StdoutPrintHandler);
        (result, write_back)
    }

    #[test]
    fn from_alternates_ends_and_writes_back() {
        let list = Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]);
        // Odd size: takes the last member.
        let (result, write_back) = run(&PdFrom::new(), vec![list]);
        assert_eq!(result.unwrap(), Value::int(3));
        assert_eq!(
            write_back,
            vec![Value::list(vec![Value::int(1), Value::int(2)])]
        );
    }

    #[test]
    fn from_b_and_from_e_take_the_ends() {
        let list = || Value::list(vec![Value::int(1), Value::int(2)]);
        let (result, write_back) = run(&PdFromB::new(), vec![list()]);
        assert_eq!(result.unwrap(), Value::int(1));
        assert_eq!(write_back, vec![Value::list(vec![Value::int(2)])]);

        let (result, write_back) = run(&PdFromE::new(), vec![list()]);
        assert_eq!(result.unwrap(), Value::int(2));
        assert_eq!(write_back, vec![Value::list(vec![Value::int(1)])]);
    }

    #[test]
    fn arb_does_not_write_back() {
        let set = Value::set(vec![Value::int(1), Value::int(2)]);
        let (result, write_back) = run(&PdArb::new(), vec![set]);
        assert!(result.is_ok());
        assert!(write_back.is_empty());
    }

    #[test]
    fn non_collections_are_rejected() {
        let (result, _) = run(&PdFrom::new(), vec![Value::int(1)]);
        assert!(result.is_err());
    }
}
