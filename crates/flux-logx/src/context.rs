use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 请求作用域上下文
///
/// 不可变；`with_value` 返回新的上下文，原上下文不受影响。克隆只复制一个 `Arc`。
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Context {
    /// 空上下文
    pub fn background() -> Self {
        Self::default()
    }

    /// 派生一个携带 `key = value` 的新上下文，同名键被覆盖
    pub fn with_value<T>(&self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut values = (*self.values).clone();
        values.insert(key.into(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// 键不存在或类型不匹配时返回 `None`
    pub fn value<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

/// 从上下文中提取一个字符串值；取不到时应返回空字符串
pub type ContextExtractor = Arc<dyn Fn(&Context) -> String + Send + Sync>;

/// 提取 `key` 处的 `String`（或 `&'static str`）值，缺失时为空字符串
pub fn string_value(key: &str) -> impl Fn(&Context) -> String + Send + Sync + 'static {
    let key = key.to_string();
    move |ctx: &Context| {
        ctx.value::<String>(&key)
            .cloned()
            .or_else(|| ctx.value::<&'static str>(&key).map(|s| s.to_string()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.is_empty());
        assert!(ctx.value::<String>("request_id").is_none());
    }

    #[test]
    fn test_with_value_does_not_touch_parent() {
        let parent = Context::background().with_value("tenant", "acme".to_string());
        let child = parent.with_value("request_id", "req-1".to_string());

        assert!(!parent.contains("request_id"));
        assert_eq!(child.value::<String>("tenant").unwrap(), "acme");
        assert_eq!(child.value::<String>("request_id").unwrap(), "req-1");
    }

    #[test]
    fn test_type_mismatch_is_none() {
        let ctx = Context::background().with_value("attempt", 3u32);
        assert_eq!(ctx.value::<u32>("attempt"), Some(&3));
        assert!(ctx.value::<String>("attempt").is_none());
    }

    #[test]
    fn test_string_value_extractor() {
        let extract = string_value("request_id");

        let owned = Context::background().with_value("request_id", "req-9".to_string());
        let borrowed = Context::background().with_value("request_id", "req-10");
        assert_eq!(extract(&owned), "req-9");
        assert_eq!(extract(&borrowed), "req-10");
        assert_eq!(extract(&Context::background()), "");
    }
}
