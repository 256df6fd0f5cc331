//! 사전 학습된 이진 결정 트리.
//!
//! 트리 정의는 외부 아티팩트(JSON)로 제공되며 로드 시 한 번만
//! 파싱됩니다. 이후 트리는 불변이므로 여러 요청이 동시에 평가해도 안전합니다.
//!
//! # 정의 형식
//!
//! ```text
//! {
//!   "field": "lag_41",        // 또는 정수 인덱스
//!   "operator": "<=",
//!   "value": 1.02,
//!   "pass": <child>,          // feature <= value
//!   "fail": <child>
//! }
//! ```
//!
//! `<child>`는 노드 객체, 숫자 리프, 또는 Avro union 래퍼
//! (`{"double": 0.9}`, `{"TreeNode": {...}}`)입니다. 최상위가
//! `{"cells": {"tree": {"init": <node>}}}` 형태인 전체 문서도 허용합니다.

mod cache;

pub use cache::TreeCache;

use crate::error::{ForecastError, ForecastResult};
use crate::lags::parse_lag_feature_name;
use serde_json::{Map, Value};
use tracing::debug;

/// 지원하는 유일한 비교 연산자.
const LESS_OR_EQUAL: &str = "<=";

/// 결정 트리 노드.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// 분기 노드
    Split {
        feature_index: usize,
        threshold: f64,
        /// `feature <= threshold`일 때
        pass: Box<TreeNode>,
        fail: Box<TreeNode>,
    },
    /// 리프 값
    Leaf(f64),
}

impl TreeNode {
    /// JSON 자식 표현을 노드로 변환.
    fn from_json(value: &Value) -> ForecastResult<TreeNode> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(TreeNode::Leaf)
                .ok_or_else(|| ForecastError::InvalidTree(format!("invalid leaf value: {}", n))),
            Value::Object(map) => {
                if map.contains_key("field") {
                    return Self::split_from_map(map);
                }
                // Avro union 래퍼: 키 하나짜리 객체
                match map.iter().next() {
                    Some((_, inner)) if map.len() == 1 => Self::from_json(inner),
                    _ => Err(ForecastError::InvalidTree(
                        "node must have a 'field' key or be a single-key union".to_string(),
                    )),
                }
            }
            other => Err(ForecastError::InvalidTree(format!(
                "unexpected node value: {}",
                other
            ))),
        }
    }

    fn split_from_map(map: &Map<String, Value>) -> ForecastResult<TreeNode> {
        let operator = map
            .get("operator")
            .and_then(Value::as_str)
            .ok_or_else(|| ForecastError::InvalidTree("missing 'operator'".to_string()))?;
        if operator != LESS_OR_EQUAL {
            return Err(ForecastError::UnsupportedOperator(operator.to_string()));
        }

        let feature_index = match map.get("field") {
            Some(Value::String(name)) => parse_lag_feature_name(name).ok_or_else(|| {
                ForecastError::InvalidTree(format!("invalid feature name: {}", name))
            })?,
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| ForecastError::InvalidTree(format!("invalid feature index: {}", n)))?,
            _ => return Err(ForecastError::InvalidTree("invalid 'field'".to_string())),
        };

        let threshold = map
            .get("value")
            .and_then(unwrap_double)
            .ok_or_else(|| ForecastError::InvalidTree("missing numeric 'value'".to_string()))?;

        let child = |key: &str| -> ForecastResult<Box<TreeNode>> {
            map.get(key)
                .ok_or_else(|| ForecastError::InvalidTree(format!("missing '{}' branch", key)))
                .and_then(Self::from_json)
                .map(Box::new)
        };

        Ok(TreeNode::Split {
            feature_index,
            threshold,
            pass: child("pass")?,
            fail: child("fail")?,
        })
    }
}

/// 숫자 또는 `{"double": x}` 래퍼에서 값을 꺼냄.
fn unwrap_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) if map.len() == 1 => map.get("double").and_then(Value::as_f64),
        _ => None,
    }
}

/// 식별자가 붙은 불변 결정 트리.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    identifier: String,
    root: TreeNode,
}

impl DecisionTree {
    /// 루트 노드로 직접 생성.
    pub fn new(identifier: impl Into<String>, root: TreeNode) -> Self {
        Self {
            identifier: identifier.into(),
            root,
        }
    }

    /// JSON 정의에서 트리를 로드.
    ///
    /// `<=` 외의 연산자는 `UnsupportedOperator`, 그 밖의 구조 오류는
    /// `InvalidTree`입니다.
    pub fn load(identifier: &str, definition: &Value) -> ForecastResult<Self> {
        let node = definition
            .pointer("/cells/tree/init")
            .unwrap_or(definition);
        let root = TreeNode::from_json(node)?;
        let tree = Self::new(identifier, root);

        debug!(
            tree = identifier,
            depth = tree.depth(),
            leaves = tree.leaf_count(),
            "결정 트리 로드"
        );
        Ok(tree)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// feature vector로 트리를 평가해 리프 값을 반환.
    ///
    /// `feature <= threshold`이면 pass 분기로 갑니다. NaN은 비교가
    /// 거짓이므로 fail 분기로 갑니다. 인덱스는 검증하지 않으므로
    /// 호출자는 `required_features()` 이상의 길이를 보장해야 합니다.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf(value) => return *value,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    pass,
                    fail,
                } => {
                    node = if features[*feature_index] <= *threshold {
                        pass
                    } else {
                        fail
                    };
                }
            }
        }
    }

    /// 평가에 필요한 최소 feature 개수 (최대 인덱스 + 1).
    pub fn required_features(&self) -> usize {
        self.fold(0, |acc, node: &TreeNode| match node {
            TreeNode::Split { feature_index, .. } => acc.max(feature_index + 1),
            TreeNode::Leaf(_) => acc,
        })
    }

    /// 루트에서 가장 깊은 리프까지의 분기 수.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                TreeNode::Leaf(_) => max = max.max(depth),
                TreeNode::Split { pass, fail, .. } => {
                    stack.push((pass, depth + 1));
                    stack.push((fail, depth + 1));
                }
            }
        }
        max
    }

    pub fn leaf_count(&self) -> usize {
        self.fold(0, |acc, node: &TreeNode| match node {
            TreeNode::Leaf(_) => acc + 1,
            TreeNode::Split { .. } => acc,
        })
    }

    fn fold<T, F>(&self, init: T, f: F) -> T
    where
        F: Fn(T, &TreeNode) -> T,
    {
        let mut acc = init;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            acc = f(acc, node);
            if let TreeNode::Split { pass, fail, .. } = node {
                stack.push(pass);
                stack.push(fail);
            }
        }
        acc
    }
}
