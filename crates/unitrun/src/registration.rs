//! Static test registration
//!
//! Every `test_case!` declaration submits one [`Registration`] through
//! `inventory`. The records are gathered once, before the first run, into
//! the global [`Registry`](crate::Registry).

use crate::test::TestFactory;

/// A test declaration as recorded at compile time
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub suite: &'static str,
    pub name: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub factory: TestFactory,
}

impl Registration {
    pub const fn new(
        suite: &'static str,
        name: &'static str,
        file: &'static str,
        line: u32,
        factory: TestFactory,
    ) -> Self {
        Self {
            suite,
            name,
            file,
            line,
            factory,
        }
    }

    pub fn descriptor(&self) -> TestDescriptor {
        TestDescriptor::new(self.suite, self.name, self.file, self.line, self.factory)
    }
}

inventory::collect!(Registration);

/// Everything a suite needs to construct and identify one test
#[derive(Debug, Clone)]
pub struct TestDescriptor {
    pub suite: String,
    pub name: String,
    pub file: String,
    pub line: u32,
    pub factory: TestFactory,
}

impl TestDescriptor {
    pub fn new(
        suite: impl Into<String>,
        name: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        factory: TestFactory,
    ) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            file: file.into(),
            line,
            factory,
        }
    }
}
