//! Global values: variables and aliases.
//!
//! All metadata here is pass-through: every read re-queries the engine and
//! every write forwards immediately, so external mutation of the same
//! global is visible on the next read. Nothing is cached locally.

use lathe_ir::{Linkage, Visibility};

use crate::constant::ConstantValue;
use crate::error::ValueResult;
use crate::operands::UserValue;
use crate::value::{value_wrapper, AnyValue, Value};

/// Metadata shared by every global value.
pub trait GlobalValueOps<'e>: ConstantValue<'e> {
    /// Alignment in bytes; 0 means the engine default.
    fn alignment(&self) -> ValueResult<u32> {
        Ok(self.engine().alignment(self.handle())?)
    }

    /// Set alignment in bytes.
    fn set_alignment(&self, bytes: u32) -> ValueResult<()> {
        Ok(self.engine().set_alignment(self.handle(), bytes)?)
    }

    /// The global's linkage.
    fn linkage(&self) -> ValueResult<Linkage> {
        Ok(self.engine().linkage(self.handle())?)
    }

    /// Set the global's linkage.
    fn set_linkage(&self, linkage: Linkage) -> ValueResult<()> {
        Ok(self.engine().set_linkage(self.handle(), linkage)?)
    }

    /// The global's symbol visibility.
    fn visibility(&self) -> ValueResult<Visibility> {
        Ok(self.engine().visibility(self.handle())?)
    }

    /// Set the global's symbol visibility.
    fn set_visibility(&self, visibility: Visibility) -> ValueResult<()> {
        Ok(self.engine().set_visibility(self.handle(), visibility)?)
    }

    /// The global's section, if assigned.
    fn section(&self) -> ValueResult<Option<String>> {
        Ok(self.engine().section(self.handle())?)
    }

    /// Assign or clear the global's section.
    fn set_section(&self, section: Option<&str>) -> ValueResult<()> {
        Ok(self.engine().set_section(self.handle(), section)?)
    }

    /// Whether the global is a declaration without definition.
    fn is_declaration(&self) -> ValueResult<bool> {
        Ok(self.engine().is_declaration(self.handle())?)
    }

    /// Whether the global is marked constant.
    fn is_global_constant(&self) -> ValueResult<bool> {
        Ok(self.engine().is_global_constant(self.handle())?)
    }

    /// Mark the global constant or not.
    fn set_global_constant(&self, constant: bool) -> ValueResult<()> {
        Ok(self.engine().set_global_constant(self.handle(), constant)?)
    }

    /// The initializer (for aliases, the aliasee), if present.
    fn initializer(&self) -> ValueResult<Option<Value<'e>>> {
        let slot = self.engine().initializer(self.handle())?;
        Ok(slot.map(|handle| Value::from_handle(self.engine(), handle)))
    }

    /// Set the initializer.
    fn set_initializer(&self, init: &dyn AnyValue<'e>) -> ValueResult<()> {
        Ok(self.engine().set_initializer(self.handle(), init.handle())?)
    }
}

value_wrapper! {
    /// A global variable.
    GlobalVariable
}

impl<'e> GlobalVariable<'e> {
    /// Whether the variable is thread-local.
    pub fn is_thread_local(&self) -> ValueResult<bool> {
        Ok(self.engine().is_thread_local(self.handle())?)
    }

    /// Mark the variable thread-local or not.
    pub fn set_thread_local(&self, enabled: bool) -> ValueResult<()> {
        Ok(self.engine().set_thread_local(self.handle(), enabled)?)
    }
}

impl<'e> UserValue<'e> for GlobalVariable<'e> {}
impl<'e> ConstantValue<'e> for GlobalVariable<'e> {}
impl<'e> GlobalValueOps<'e> for GlobalVariable<'e> {}

value_wrapper! {
    /// A global alias for another global.
    GlobalAlias
}

impl<'e> UserValue<'e> for GlobalAlias<'e> {}
impl<'e> ConstantValue<'e> for GlobalAlias<'e> {}
impl<'e> GlobalValueOps<'e> for GlobalAlias<'e> {}
