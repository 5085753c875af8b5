use tracing::warn;

use super::{MetadataSource, MetadataTable, QueryDialect, QueryError};

/// Runs queries on `primary`, switching to `secondary` when the primary fails.
///
/// Both sources must accept the primary's dialect.
pub struct FailoverSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P: MetadataSource, S: MetadataSource> FailoverSource<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: MetadataSource, S: MetadataSource> MetadataSource for FailoverSource<P, S> {
    fn dialect(&self) -> QueryDialect {
        self.primary.dialect()
    }

    fn execute(&self, statement: &str, label: &str) -> Result<MetadataTable, QueryError> {
        match self.primary.execute(statement, label) {
            Ok(table) => Ok(table),
            Err(primary) => {
                warn!(label, error = %primary, "Primary metadata source failed, trying secondary");
                self.secondary
                    .execute(statement, label)
                    .map_err(|secondary| QueryError::Exhausted {
                        primary: Box::new(primary),
                        secondary: Box::new(secondary),
                    })
            }
        }
    }
}
