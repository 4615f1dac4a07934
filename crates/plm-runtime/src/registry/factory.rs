//! Mapping from list kinds to constructors

use futures::future::BoxFuture;
use plm_core::{ListError, ListKind, ListRecord, ListResult};
use plm_repository::ItemProvider;
use std::collections::HashMap;
use std::sync::Arc;

use crate::list::{
    CachedList, ListHandle, OrderingStrategy, PriorityOrdering, QueueOrdering, StackOrdering,
};

/// Opens a list for a stored record
pub type ListConstructor =
    fn(ListRecord, Arc<dyn ItemProvider>) -> BoxFuture<'static, ListResult<ListHandle>>;

/// Constructor for a [`CachedList`] with ordering `S`
pub fn cached_list<S: OrderingStrategy>(
    record: ListRecord,
    provider: Arc<dyn ItemProvider>,
) -> BoxFuture<'static, ListResult<ListHandle>> {
    Box::pin(async move {
        let list = CachedList::<S>::open(record, provider).await?;
        Ok(Arc::new(list) as ListHandle)
    })
}

/// The set of list kinds a registry can construct
///
/// The set is fixed when the registry is built. Stored lists whose kind is
/// not in the set are skipped when the registry loads.
#[derive(Clone)]
pub struct ListFactory {
    constructors: HashMap<ListKind, ListConstructor>,
}

impl ListFactory {
    /// A factory for every built-in kind
    pub fn new() -> Self {
        Self::with_kinds(&ListKind::ALL)
    }

    /// A factory that constructs nothing
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory for the given built-in kinds
    pub fn with_kinds(kinds: &[ListKind]) -> Self {
        let mut factory = Self::empty();
        for kind in kinds {
            let constructor: ListConstructor = match kind {
                ListKind::Queue => cached_list::<QueueOrdering>,
                ListKind::Stack => cached_list::<StackOrdering>,
                ListKind::Priority => cached_list::<PriorityOrdering>,
            };
            factory.register(*kind, constructor);
        }
        factory
    }

    /// Register or replace the constructor for `kind`
    pub fn register(&mut self, kind: ListKind, constructor: ListConstructor) -> &mut Self {
        self.constructors.insert(kind, constructor);
        self
    }

    pub fn supports(&self, kind: ListKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Supported kinds, sorted
    pub fn kinds(&self) -> Vec<ListKind> {
        let mut kinds: Vec<_> = self.constructors.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Resolve a persisted kind name to a supported kind
    pub fn resolve(&self, name: &str) -> Option<ListKind> {
        name.parse::<ListKind>()
            .ok()
            .filter(|kind| self.supports(*kind))
    }

    /// Open the list for `record` as a `kind` list
    pub async fn construct(
        &self,
        kind: ListKind,
        record: ListRecord,
        provider: Arc<dyn ItemProvider>,
    ) -> ListResult<ListHandle> {
        let constructor = self.constructors.get(&kind).ok_or_else(|| {
            ListError::Validation(format!("The list kind '{}' is not supported.", kind))
        })?;
        constructor(record, provider).await
    }
}

impl Default for ListFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::PersistentList;
    use plm_repository::MemoryProvider;

    #[test]
    fn test_default_supports_all_kinds() {
        let factory = ListFactory::new();
        assert_eq!(factory.kinds(), ListKind::ALL.to_vec());
    }

    #[test]
    fn test_resolve_persisted_names() {
        let factory = ListFactory::with_kinds(&[ListKind::Queue]);

        assert_eq!(factory.resolve("queue"), Some(ListKind::Queue));
        assert_eq!(factory.resolve("Queue"), Some(ListKind::Queue));
        assert_eq!(factory.resolve("stack"), None);
        assert_eq!(factory.resolve("org.example.Unknown"), None);
    }

    #[tokio::test]
    async fn test_construct_unsupported_kind() {
        let factory = ListFactory::empty();
        let result = factory
            .construct(
                ListKind::Stack,
                ListRecord::new("s", ListKind::Stack),
                Arc::new(MemoryProvider::new()),
            )
            .await;

        assert!(matches!(result, Err(ListError::Validation(_))));
    }

    #[tokio::test]
    async fn test_construct_builds_requested_kind() {
        let factory = ListFactory::new();
        let list = factory
            .construct(
                ListKind::Stack,
                ListRecord::new("s", ListKind::Stack).with_id(4),
                Arc::new(MemoryProvider::new()),
            )
            .await
            .unwrap();

        assert_eq!(list.kind(), ListKind::Stack);
        assert_eq!(list.id(), Some(4));
        assert_eq!(list.key(), "s");
    }
}
