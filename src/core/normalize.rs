use serde_json::{Map, Value};

type Renames = &'static [(&'static str, &'static str)];

const NO_RENAMES: Renames = &[];

/// 單一擷取策略。CMS 各端點的回應外殼不一致，
/// 依序嘗試各策略，第一個命中者勝出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// 頂層欄位 `{ name: {...} }`
    Field { name: &'static str, renames: Renames },
    /// `data` 外殼下的欄位 `{ data: { name: {...} } }`
    Envelope { name: &'static str, renames: Renames },
    /// 整個回應物件本身就是資料
    Root,
}

impl Extraction {
    pub fn apply(&self, body: &Value) -> Option<Value> {
        match self {
            Extraction::Field { name, renames } => body
                .get(*name)
                .filter(|value| !value.is_null())
                .map(|value| rename_fields(value, renames)),
            Extraction::Envelope { name, renames } => body
                .get("data")
                .and_then(|data| data.get(*name))
                .filter(|value| !value.is_null())
                .map(|value| rename_fields(value, renames)),
            Extraction::Root => match body {
                Value::Object(map) if !map.is_empty() => Some(body.clone()),
                _ => None,
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            Extraction::Field { name, .. } => name.to_string(),
            Extraction::Envelope { name, .. } => format!("data.{}", name),
            Extraction::Root => "<root>".to_string(),
        }
    }
}

/// 某個快取鍵的完整擷取規則：文件欄位 → 已知替代欄位 → `data` 外殼下的同樣順序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRule {
    strategies: Vec<Extraction>,
}

impl ShapeRule {
    pub fn field(name: &'static str) -> ShapeRuleBuilder {
        ShapeRuleBuilder {
            fields: vec![(name, NO_RENAMES)],
            root_fallback: false,
        }
    }

    /// 回應本身即為資料（例如詳情頁）
    pub fn root() -> Self {
        Self {
            strategies: vec![Extraction::Root],
        }
    }

    pub fn strategies(&self) -> &[Extraction] {
        &self.strategies
    }

    /// 依序套用策略，回傳第一個命中的結果
    pub fn extract(&self, body: &Value) -> Option<Value> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.apply(body) {
                tracing::trace!("🔍 Response matched strategy {}", strategy.describe());
                return Some(value);
            }
        }
        None
    }

    pub fn describe(&self) -> String {
        self.strategies
            .iter()
            .map(Extraction::describe)
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

pub struct ShapeRuleBuilder {
    fields: Vec<(&'static str, Renames)>,
    root_fallback: bool,
}

impl ShapeRuleBuilder {
    pub fn alternate(mut self, name: &'static str) -> Self {
        self.fields.push((name, NO_RENAMES));
        self
    }

    /// 替代欄位，且內部欄位名稱需改名（`from` → `to`）
    pub fn alternate_renamed(mut self, name: &'static str, renames: Renames) -> Self {
        self.fields.push((name, renames));
        self
    }

    pub fn with_root_fallback(mut self) -> Self {
        self.root_fallback = true;
        self
    }

    pub fn build(self) -> ShapeRule {
        let mut strategies: Vec<Extraction> = self
            .fields
            .iter()
            .map(|&(name, renames)| Extraction::Field { name, renames })
            .collect();
        strategies.extend(
            self.fields
                .iter()
                .map(|&(name, renames)| Extraction::Envelope { name, renames }),
        );
        if self.root_fallback {
            strategies.push(Extraction::Root);
        }
        ShapeRule { strategies }
    }
}

fn rename_fields(value: &Value, renames: &[(&str, &str)]) -> Value {
    let Value::Object(obj) = value else {
        return value.clone();
    };
    if renames.is_empty() {
        return value.clone();
    }

    let mut data = Map::new();
    for (key, field_value) in obj {
        let mapped_key = renames
            .iter()
            .find(|(from, _)| *from == key.as_str())
            .map(|(_, to)| *to)
            .unwrap_or(key.as_str());
        // 已存在的目標欄位優先，不被改名欄位覆蓋
        if !obj.contains_key(mapped_key) || mapped_key == key.as_str() {
            data.insert(mapped_key.to_string(), field_value.clone());
        }
    }
    Value::Object(data)
}
