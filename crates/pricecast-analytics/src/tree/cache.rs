//! 프로세스 전역 결정 트리 캐시.
//!
//! 트리 식별자마다 한 번만 아티팩트를 읽고 파싱합니다. 같은 식별자를
//! 동시에 요청하면 한 호출자만 로드하고 나머지는 그 결과를 기다립니다.
//! 로드에 실패한 식별자는 슬롯을 제거하므로 다음 요청이 다시 시도하고,
//! 실패한 식별자가 맵에 쌓이지 않습니다.

use super::DecisionTree;
use crate::error::{ForecastError, ForecastResult};
use once_cell::sync::OnceCell;
use pricecast_data::TreeArtifactSource;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{error, info};

type Slot = Arc<OnceCell<Arc<DecisionTree>>>;

/// 식별자별 트리 캐시.
pub struct TreeCache {
    source: Arc<dyn TreeArtifactSource>,
    slots: RwLock<HashMap<String, Slot>>,
}

impl TreeCache {
    /// 아티팩트 소스로 캐시 생성.
    pub fn new(source: Arc<dyn TreeArtifactSource>) -> Self {
        Self {
            source,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// 트리 조회. 처음 요청된 식별자는 아티팩트에서 로드합니다.
    ///
    /// 아티팩트를 읽지 못하면 `InvalidTree`, 정의가 잘못되었으면
    /// `DecisionTree::load`의 에러를 그대로 반환합니다.
    pub fn get(&self, identifier: &str) -> ForecastResult<Arc<DecisionTree>> {
        let slot = self.slot(identifier);
        let result = slot
            .get_or_try_init(|| {
                let definition = self
                    .source
                    .load_definition(identifier)
                    .map_err(|e| ForecastError::InvalidTree(format!("{}: {}", identifier, e)))?;
                let tree = DecisionTree::load(identifier, &definition)?;
                info!(tree = identifier, "결정 트리 캐시 등록");
                Ok(Arc::new(tree))
            })
            .cloned();

        if result.is_err() {
            self.evict_empty(identifier, &slot);
        }
        result
    }

    /// 로드 완료된 트리가 있는지 확인.
    pub fn contains(&self, identifier: &str) -> bool {
        self.read_slots()
            .get(identifier)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// 로드 완료된 트리 수.
    pub fn len(&self) -> usize {
        self.read_slots()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, identifier: &str) -> Slot {
        if let Some(slot) = self.read_slots().get(identifier) {
            return Arc::clone(slot);
        }

        let mut slots = self.write_slots();
        Arc::clone(slots.entry(identifier.to_string()).or_default())
    }

    /// 로드에 실패한 빈 슬롯 제거. 그 사이 다른 호출자가 채웠거나
    /// 새 슬롯으로 바뀌었다면 그대로 둡니다.
    fn evict_empty(&self, identifier: &str, slot: &Slot) {
        let mut slots = self.write_slots();
        let stale = slots
            .get(identifier)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && current.get().is_none());
        if stale {
            slots.remove(identifier);
        }
    }

    fn write_slots(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Slot>> {
        match self.slots.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("TreeCache RwLock poisoned (write), recovering");
                poisoned.into_inner()
            }
        }
    }

    fn read_slots(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Slot>> {
        match self.slots.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("TreeCache RwLock poisoned (read), recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl std::fmt::Debug for TreeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCache")
            .field("loaded", &self.len())
            .finish()
    }
}
