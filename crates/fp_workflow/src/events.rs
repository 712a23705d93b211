// crates/fp_workflow/src/events.rs

//! 事件系统模块
//!
//! 战役驱动器通过 [`EventDispatcher`] 发布进度事件，
//! [`LoggingListener`] 把它们转发到 tracing。

use crate::run::RunState;
use parking_lot::RwLock;
use std::sync::Arc;

/// 战役事件
#[derive(Debug, Clone)]
pub enum CampaignEvent {
    /// 战役开始
    CampaignStarted {
        /// 起始实现
        start: u32,
        /// 结束实现（含）
        end: u32,
        /// 范围内的事件总数
        total_events: usize,
    },
    /// 实现没有洪水事件，被跳过
    RealizationSkipped {
        /// 实现编号
        realization: u32,
    },
    /// 事件开始
    EventStarted {
        /// 实现编号
        realization: u32,
        /// 洪水序号（1 起始）
        flood_index: u32,
        /// 入流流量 [m³/s]
        discharge: f64,
        /// 阻塞深度 [m]
        obstruction_depth: f64,
    },
    /// 事件状态变更
    StateChanged {
        /// 实现编号
        realization: u32,
        /// 洪水序号
        flood_index: u32,
        /// 旧状态
        old_state: RunState,
        /// 新状态
        new_state: RunState,
    },
    /// 事件已记录
    EventRecorded {
        /// 实现编号
        realization: u32,
        /// 洪水序号
        flood_index: u32,
        /// 最大淹没深度 [m]
        max_flood_depth: f64,
    },
    /// 事件失败，战役随即终止
    EventFailed {
        /// 实现编号
        realization: u32,
        /// 洪水序号
        flood_index: u32,
        /// 入流流量 [m³/s]
        discharge: f64,
        /// 失败前到达的状态
        state: RunState,
        /// 错误信息
        error: String,
    },
    /// 战役完成
    CampaignCompleted {
        /// 已记录事件数
        events: usize,
        /// 跳过的实现数
        skipped: usize,
        /// 运行时长 (秒)
        duration_secs: f64,
    },
}

impl CampaignEvent {
    /// 获取事件名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::CampaignStarted { .. } => "CampaignStarted",
            Self::RealizationSkipped { .. } => "RealizationSkipped",
            Self::EventStarted { .. } => "EventStarted",
            Self::StateChanged { .. } => "StateChanged",
            Self::EventRecorded { .. } => "EventRecorded",
            Self::EventFailed { .. } => "EventFailed",
            Self::CampaignCompleted { .. } => "CampaignCompleted",
        }
    }

    /// 事件所属实现，战役级事件返回 None
    pub fn realization(&self) -> Option<u32> {
        match self {
            Self::RealizationSkipped { realization }
            | Self::EventStarted { realization, .. }
            | Self::StateChanged { realization, .. }
            | Self::EventRecorded { realization, .. }
            | Self::EventFailed { realization, .. } => Some(*realization),
            Self::CampaignStarted { .. } | Self::CampaignCompleted { .. } => None,
        }
    }
}

/// 事件监听器trait
pub trait EventListener: Send + Sync {
    /// 处理事件
    fn on_event(&self, event: &CampaignEvent);

    /// 获取监听器名称 (用于调试)
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// 函数式事件监听器
pub struct FnListener<F>
where
    F: Fn(&CampaignEvent) + Send + Sync,
{
    name: String,
    handler: F,
}

impl<F> FnListener<F>
where
    F: Fn(&CampaignEvent) + Send + Sync,
{
    /// 创建函数式监听器
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> EventListener for FnListener<F>
where
    F: Fn(&CampaignEvent) + Send + Sync,
{
    fn on_event(&self, event: &CampaignEvent) {
        (self.handler)(event);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 日志事件监听器
pub struct LoggingListener {
    /// 日志前缀
    prefix: String,
    /// 是否输出状态变更
    verbose: bool,
}

impl LoggingListener {
    /// 创建日志监听器
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            verbose: false,
        }
    }

    /// 设置详细模式
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl EventListener for LoggingListener {
    fn on_event(&self, event: &CampaignEvent) {
        match event {
            CampaignEvent::CampaignStarted {
                start,
                end,
                total_events,
            } => {
                tracing::info!(
                    "{}: Campaign R{:04}to{:04} started ({} flood events)",
                    self.prefix,
                    start,
                    end,
                    total_events
                );
            }
            CampaignEvent::RealizationSkipped { realization } => {
                tracing::info!(
                    "{}: Climate realization {} has 0 floods",
                    self.prefix,
                    realization
                );
            }
            CampaignEvent::EventStarted {
                realization,
                flood_index,
                discharge,
                obstruction_depth,
            } => {
                tracing::info!(
                    "{}: Climate realization {}, flood index {}, obstruction depth {:5.2}, discharge {:6.2}",
                    self.prefix,
                    realization,
                    flood_index,
                    obstruction_depth,
                    discharge
                );
            }
            CampaignEvent::StateChanged {
                realization,
                flood_index,
                old_state,
                new_state,
            } => {
                if self.verbose {
                    tracing::info!(
                        "{}: R{} Fl{} state: {} -> {}",
                        self.prefix,
                        realization,
                        flood_index,
                        old_state,
                        new_state
                    );
                } else {
                    tracing::debug!(
                        "{}: R{} Fl{} state: {} -> {}",
                        self.prefix,
                        realization,
                        flood_index,
                        old_state,
                        new_state
                    );
                }
            }
            CampaignEvent::EventRecorded {
                realization,
                flood_index,
                max_flood_depth,
            } => {
                tracing::info!(
                    "{}: R{} Fl{} recorded, max flood depth {:.3} m",
                    self.prefix,
                    realization,
                    flood_index,
                    max_flood_depth
                );
            }
            CampaignEvent::EventFailed {
                realization,
                flood_index,
                discharge,
                state,
                error,
            } => {
                tracing::error!(
                    "{}: Climate realization {}, flood index {} (discharge {:.2}) failed after {}: {}",
                    self.prefix,
                    realization,
                    flood_index,
                    discharge,
                    state,
                    error
                );
            }
            CampaignEvent::CampaignCompleted {
                events,
                skipped,
                duration_secs,
            } => {
                tracing::info!(
                    "{}: Campaign completed in {:.1}s ({} events recorded, {} realizations skipped)",
                    self.prefix,
                    duration_secs,
                    events,
                    skipped
                );
            }
        }
    }

    fn name(&self) -> &str {
        "LoggingListener"
    }
}

/// 事件分发器
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
}

impl EventDispatcher {
    /// 创建新的事件分发器
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// 添加监听器
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        let name = listener.name().to_string();
        self.listeners.write().push(listener);
        tracing::debug!("Added event listener: {}", name);
    }

    /// 添加函数式监听器
    pub fn add_fn_listener<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&CampaignEvent) + Send + Sync + 'static,
    {
        let listener = Arc::new(FnListener::new(name, handler));
        self.add_listener(listener);
    }

    /// 清除所有监听器
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    /// 分发事件
    pub fn emit(&self, event: CampaignEvent) {
        let listeners = self.listeners.read();

        tracing::trace!("Emitting event: {}", event.name());

        for listener in listeners.iter() {
            listener.on_event(&event);
        }
    }

    /// 获取监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_event_dispatcher() {
        let dispatcher = EventDispatcher::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        dispatcher.add_fn_listener("test", move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.emit(CampaignEvent::RealizationSkipped { realization: 4 });
        dispatcher.emit(CampaignEvent::EventRecorded {
            realization: 5,
            flood_index: 1,
            max_flood_depth: 0.2,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_listeners_see_events_in_order() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        dispatcher.add_fn_listener("order", move |e| sink.lock().push(e.name()));
        dispatcher.add_listener(Arc::new(LoggingListener::new("test").verbose()));

        dispatcher.emit(CampaignEvent::CampaignStarted {
            start: 1,
            end: 2,
            total_events: 0,
        });
        dispatcher.emit(CampaignEvent::StateChanged {
            realization: 1,
            flood_index: 1,
            old_state: RunState::Pending,
            new_state: RunState::Staged,
        });

        assert_eq!(*seen.lock(), vec!["CampaignStarted", "StateChanged"]);
        dispatcher.clear();
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_event_realization() {
        let event = CampaignEvent::EventFailed {
            realization: 9,
            flood_index: 2,
            discharge: 150.0,
            state: RunState::BoundarySet,
            error: "solver".into(),
        };
        assert_eq!(event.realization(), Some(9));
        assert_eq!(event.name(), "EventFailed");

        let done = CampaignEvent::CampaignCompleted {
            events: 0,
            skipped: 0,
            duration_secs: 0.0,
        };
        assert_eq!(done.realization(), None);
    }
}
