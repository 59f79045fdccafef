use crate::{
    Error,
    diagnostic::Diagnostics,
    event_call::scan_event_types,
    extract::extract,
    prelude::*,
    registry::EnumRegistry,
    resolve::resolve,
    scan::scan,
};

///
/// Session
///
/// State of one compiler run: the resolved type list, the enum registry and
/// the diagnostics collected so far. Dropped when the run ends.
///

#[derive(Debug)]
pub struct Session<'a> {
    program: &'a Program,
    options: Options,
    types: Vec<TypeDescriptor>,
    event_types: Vec<EventTypeDescriptor>,
    enums: EnumRegistry,
    diagnostics: Diagnostics,
}

impl<'a> Session<'a> {
    /// Scan, extract and resolve `program`.
    pub fn analyze(program: &'a Program, options: Options) -> Result<Self, Error> {
        let mut diagnostics = Diagnostics::new();
        let mut enums = EnumRegistry::new();

        // Phase 1: type map
        let mut types = scan(program, &mut diagnostics)?;

        // Phase 2: own members
        for ty in &mut types {
            if let Some(decl) = program.type_decl(&ty.full_name) {
                extract(program, decl, ty, &mut enums, &mut diagnostics);
            }
        }

        // Phase 3: inheritance
        resolve(program, &mut types, &mut diagnostics);

        // Phase 4: event calls
        let event_types = scan_event_types(program, &mut diagnostics)?;

        tracing::debug!(
            types = types.len(),
            event_types = event_types.len(),
            enums = enums.len(),
            diagnostics = diagnostics.items().len(),
            "analysis complete"
        );

        Ok(Self {
            program,
            options,
            types,
            event_types,
            enums,
            diagnostics,
        })
    }

    #[must_use]
    pub const fn program(&self) -> &'a Program {
        self.program
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Eligible types, ancestors first.
    #[must_use]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    #[must_use]
    pub fn type_descriptor(&self, full_name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.full_name == full_name)
    }

    /// Types exposing event calls, ancestors first.
    #[must_use]
    pub fn event_types(&self) -> &[EventTypeDescriptor] {
        &self.event_types
    }

    #[must_use]
    pub const fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    pub const fn enums_mut(&mut self) -> &mut EnumRegistry {
        &mut self.enums
    }

    /// Read the types while updating the registry, for emitters that mark
    /// enums as they go.
    pub fn split_mut(
        &mut self,
    ) -> (&[TypeDescriptor], &[EventTypeDescriptor], &mut EnumRegistry) {
        (&self.types, &self.event_types, &mut self.enums)
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Hand the collected diagnostics to the caller, ending the session.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
