use crate::transpiler::ddl::{DdlFormat, GenericDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// ANSI-flavored fallback; every hook keeps its default.
pub struct GenericGenerator;

impl SqlGenerator for GenericGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &GenericDdl
    }
}
