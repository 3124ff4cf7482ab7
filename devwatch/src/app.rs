//! App state and main loop: input handling, applying scheduler updates, device actions, and drawing.

use std::{
    collections::BTreeSet,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;

use crate::api::ApiClient;
use crate::history::History;
use crate::scheduler::{DetailPoller, DetailUpdate, Scheduler, Update, DETAIL_REFRESH};
use crate::settings::{save_settings, RefreshConfig};
use crate::types::{DeviceDetail, DeviceUpdate, InventoryDevice, NewDevice};
use crate::ui::chart::{ChartAdapter, Metric};
use crate::ui::detail::{draw_detail, DetailView};
use crate::ui::devices::draw_device_table;
use crate::ui::form::{DeviceForm, FormAction};
use crate::ui::header::{draw_header, HeaderInfo, Tab};
use crate::ui::inventory::draw_inventory;
use crate::ui::notice::{draw_confirm, draw_footer, Notice, NoticeLevel};
use crate::ui::settings::{SettingsAction, SettingsDialog};
use crate::ui::util::clamp_selection;
use crate::views::{
    detail_fields, device_rows, interface_rows, inventory_rows, summary, DeviceRow, Summary,
};

/// Results of user-initiated requests, delivered back to the UI loop.
#[derive(Debug)]
pub enum ActionOutcome {
    Inventory(Result<Vec<InventoryDevice>, String>),
    Created(Result<Option<String>, String>),
    Updated(Result<Option<String>, String>),
    Deleted {
        deleted: usize,
        failed: Vec<String>,
        origin: Tab,
    },
}

enum Modal {
    AddDevice(DeviceForm),
    Settings(SettingsDialog),
    ConfirmDelete {
        ids: Vec<String>,
        question: String,
        origin: Tab,
    },
}

pub struct App {
    client: Arc<ApiClient>,
    scheduler: Scheduler<ApiClient>,
    updates: UnboundedReceiver<Update>,
    actions_tx: UnboundedSender<ActionOutcome>,
    actions_rx: UnboundedReceiver<ActionOutcome>,
    config: RefreshConfig,
    tab: Tab,

    // Dashboard
    history: History,
    cpu_chart: ChartAdapter,
    mem_chart: ChartAdapter,
    summary: Option<Summary>,
    rows: Vec<DeviceRow>,
    dash_selected: usize,
    last_snapshot_seq: u64,
    last_metrics_seq: u64,
    last_updated: Option<String>,
    last_error: Option<String>,

    // Devices tab
    inventory: Option<Vec<InventoryDevice>>,
    inv_selected: usize,
    inv_marked: BTreeSet<String>,

    // Detail view
    detail: DetailPoller<ApiClient>,
    detail_rx: UnboundedReceiver<DetailUpdate>,
    detail_id: Option<String>,
    detail_data: Option<DeviceDetail>,
    detail_cpu: ChartAdapter,
    detail_mem: ChartAdapter,
    last_detail_seq: u64,

    modal: Option<Modal>,
    notice: Option<Notice>,
    should_quit: bool,
}

fn clock() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl App {
    pub fn new(client: ApiClient, config: RefreshConfig) -> Self {
        let client = Arc::new(client);
        let (tx, updates) = unbounded_channel();
        let (actions_tx, actions_rx) = unbounded_channel();
        let (detail_tx, detail_rx) = unbounded_channel();
        Self {
            scheduler: Scheduler::new(client.clone(), tx),
            detail: DetailPoller::new(client.clone(), detail_tx),
            client,
            updates,
            actions_tx,
            actions_rx,
            config,
            tab: Tab::Dashboard,
            history: History::default(),
            cpu_chart: ChartAdapter::new(Metric::Cpu),
            mem_chart: ChartAdapter::new(Metric::Memory),
            summary: None,
            rows: Vec::new(),
            dash_selected: 0,
            last_snapshot_seq: 0,
            last_metrics_seq: 0,
            last_updated: None,
            last_error: None,
            inventory: None,
            inv_selected: 0,
            inv_marked: BTreeSet::new(),
            detail_rx,
            detail_id: None,
            detail_data: None,
            detail_cpu: ChartAdapter::new(Metric::Cpu),
            detail_mem: ChartAdapter::new(Metric::Memory),
            last_detail_seq: 0,
            modal: None,
            notice: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        self.scheduler.start(self.config);

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        self.scheduler.stop();
        self.detail.stop();

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(u) = self.updates.try_recv() {
                self.apply_update(u);
            }
            while let Ok(d) = self.detail_rx.try_recv() {
                self.apply_detail(d);
            }
            while let Ok(o) = self.actions_rx.try_recv() {
                self.apply_outcome(o);
            }
            if self.notice.as_ref().is_some_and(|n| n.expired(Instant::now())) {
                self.notice = None;
            }

            terminal.draw(|f| self.draw(f))?;

            // Tick rate
            sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice::new(level, text));
    }

    // ---- scheduler updates ----

    pub fn apply_update(&mut self, u: Update) {
        match u {
            Update::Snapshot { seq, cycle, data } => {
                if seq < self.last_snapshot_seq {
                    tracing::debug!(seq, last = self.last_snapshot_seq, "dropping stale snapshot");
                    return;
                }
                self.last_snapshot_seq = seq;
                self.summary = Some(summary(&data));
                self.rows = device_rows(&data.devices);
                clamp_selection(&mut self.dash_selected, self.rows.len());
                self.record_sample(&data.devices);
                self.last_updated = Some(clock());
                self.last_error = None;
                tracing::info!(
                    ?cycle,
                    total = data.total,
                    online = data.online,
                    offline = data.offline,
                    "dashboard updated"
                );
            }
            Update::Metrics { seq, devices } => {
                if seq < self.last_metrics_seq {
                    return;
                }
                self.last_metrics_seq = seq;
                self.record_sample(&devices);
                self.last_error = None;
            }
            Update::Failed { error, .. } => self.last_error = Some(error),
        }
    }

    pub fn apply_detail(&mut self, u: DetailUpdate) {
        match u {
            DetailUpdate::Loaded { seq, detail } => {
                // Late results for a device no longer shown, or older than what is on screen
                if self.detail_id.as_deref() != Some(detail.id.as_str()) || seq < self.last_detail_seq {
                    return;
                }
                self.last_detail_seq = seq;
                let h = History::from_detail(&detail.history);
                self.detail_cpu.render(&h);
                self.detail_mem.render(&h);
                tracing::debug!(device = %detail.id, points = h.len(), "device detail updated");
                self.detail_data = Some(detail);
            }
            DetailUpdate::Failed { id, error } => {
                if self.detail_id.as_deref() == Some(id.as_str()) {
                    self.notify(
                        NoticeLevel::Danger,
                        format!("Failed to load device details: {error}"),
                    );
                }
            }
        }
    }

    fn record_sample(&mut self, devices: &[crate::types::Device]) {
        if self.history.record(devices, clock()).is_some() {
            self.cpu_chart.render(&self.history);
            self.mem_chart.render(&self.history);
        } else {
            tracing::debug!("no online devices with readings; chart unchanged");
        }
    }

    // ---- user actions ----

    fn load_inventory(&self) {
        let (client, tx) = (self.client.clone(), self.actions_tx.clone());
        tokio::spawn(async move {
            let res = client.list_devices().await.map_err(|e| {
                tracing::warn!("device list failed: {e}");
                e.summary()
            });
            let _ = tx.send(ActionOutcome::Inventory(res));
        });
    }

    fn create_device(&self, device: NewDevice) {
        let (client, tx) = (self.client.clone(), self.actions_tx.clone());
        tokio::spawn(async move {
            let res = client.create_device(&device).await.map_err(|e| {
                tracing::warn!(ip = %device.ip, "add device failed: {e}");
                e.summary()
            });
            let _ = tx.send(ActionOutcome::Created(res));
        });
    }

    fn update_device(&self, id: String, update: DeviceUpdate) {
        let (client, tx) = (self.client.clone(), self.actions_tx.clone());
        tokio::spawn(async move {
            let res = client.update_device(&id, &update).await.map_err(|e| {
                tracing::warn!(%id, "update device failed: {e}");
                e.summary()
            });
            let _ = tx.send(ActionOutcome::Updated(res));
        });
    }

    // One DELETE after another; the tally is reported once at the end.
    fn delete_devices(&self, ids: Vec<String>, origin: Tab) {
        let (client, tx) = (self.client.clone(), self.actions_tx.clone());
        tokio::spawn(async move {
            let mut deleted = 0;
            let mut failed = Vec::new();
            for id in ids {
                match client.delete_device(&id).await {
                    Ok(_) => deleted += 1,
                    Err(e) => {
                        tracing::warn!(%id, "delete failed: {e}");
                        failed.push(e.summary());
                    }
                }
            }
            let _ = tx.send(ActionOutcome::Deleted {
                deleted,
                failed,
                origin,
            });
        });
    }

    pub fn apply_outcome(&mut self, o: ActionOutcome) {
        match o {
            ActionOutcome::Inventory(Ok(devs)) => {
                self.inv_marked.retain(|id| devs.iter().any(|d| &d.id == id));
                clamp_selection(&mut self.inv_selected, devs.len());
                self.inventory = Some(devs);
            }
            ActionOutcome::Inventory(Err(e)) => {
                self.notify(NoticeLevel::Danger, format!("Failed to load devices: {e}"));
            }
            ActionOutcome::Created(Ok(msg)) => {
                self.notify(
                    NoticeLevel::Success,
                    msg.unwrap_or_else(|| "Device added".into()),
                );
                self.reload(self.tab);
            }
            ActionOutcome::Created(Err(e)) => {
                self.notify(NoticeLevel::Danger, format!("Add failed: {e}"));
            }
            ActionOutcome::Updated(Ok(msg)) => {
                self.notify(
                    NoticeLevel::Success,
                    msg.unwrap_or_else(|| "Device updated".into()),
                );
                self.reload(self.tab);
            }
            ActionOutcome::Updated(Err(e)) => {
                self.notify(NoticeLevel::Danger, format!("Update failed: {e}"));
            }
            ActionOutcome::Deleted {
                deleted,
                failed,
                origin,
            } => {
                if failed.is_empty() {
                    self.notify(NoticeLevel::Success, format!("{deleted} device(s) deleted"));
                } else {
                    self.notify(
                        if deleted == 0 {
                            NoticeLevel::Danger
                        } else {
                            NoticeLevel::Warning
                        },
                        format!(
                            "{deleted} deleted, {} failed: {}",
                            failed.len(),
                            failed[0]
                        ),
                    );
                }
                if origin == Tab::Devices {
                    self.inv_marked.clear();
                }
                self.reload(origin);
            }
        }
    }

    fn reload(&mut self, tab: Tab) {
        match tab {
            Tab::Dashboard => self.scheduler.refresh_now(),
            Tab::Devices => self.load_inventory(),
            Tab::Detail => self.start_detail(),
        }
    }

    // Each view polls only while it is shown.
    fn switch_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        match std::mem::replace(&mut self.tab, tab) {
            Tab::Dashboard => self.scheduler.stop(),
            Tab::Detail => self.detail.stop(),
            Tab::Devices => {}
        }
        match tab {
            Tab::Dashboard => self.scheduler.restart(self.config),
            Tab::Devices => self.load_inventory(),
            Tab::Detail => self.start_detail(),
        }
    }

    fn start_detail(&mut self) {
        if let Some(id) = self.detail_id.clone() {
            self.detail.start(id, DETAIL_REFRESH);
        }
    }

    fn open_detail(&mut self, id: String) {
        if self.detail_id.as_deref() != Some(id.as_str()) {
            // Another device: drop what the previous one drew.
            self.detail_data = None;
            self.detail_cpu = ChartAdapter::new(Metric::Cpu);
            self.detail_mem = ChartAdapter::new(Metric::Memory);
            self.detail_id = Some(id);
        }
        if self.tab == Tab::Detail {
            self.start_detail();
        } else {
            self.switch_tab(Tab::Detail);
        }
    }

    fn save_config(&mut self, cfg: RefreshConfig) {
        self.config = cfg;
        match save_settings(&cfg) {
            Ok(()) => self.notify(
                NoticeLevel::Success,
                "Settings saved; new refresh cadence is active",
            ),
            Err(e) => {
                tracing::warn!("saving settings failed: {e}");
                self.notify(
                    NoticeLevel::Warning,
                    format!("Cadence applied but not saved: {e}"),
                );
            }
        }
        if self.tab == Tab::Dashboard {
            self.scheduler.restart(cfg);
        }
    }

    // ---- input ----

    fn handle_key(&mut self, k: KeyEvent) {
        if let Some(modal) = self.modal.take() {
            self.modal = self.handle_modal_key(modal, k);
            return;
        }
        if self.tab == Tab::Detail {
            match k.code {
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Tab => {
                    self.switch_tab(Tab::Dashboard);
                    return;
                }
                KeyCode::Char('r') => {
                    self.start_detail();
                    return;
                }
                _ => {}
            }
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('x') => self.notice = None,
            KeyCode::Char('1') => self.switch_tab(Tab::Dashboard),
            KeyCode::Char('2') => self.switch_tab(Tab::Devices),
            KeyCode::Tab | KeyCode::BackTab => self.switch_tab(match self.tab {
                Tab::Dashboard => Tab::Devices,
                Tab::Devices | Tab::Detail => Tab::Dashboard,
            }),
            _ => match self.tab {
                Tab::Dashboard => self.handle_dashboard_key(k),
                Tab::Devices => self.handle_devices_key(k),
                Tab::Detail => {}
            },
        }
    }

    fn handle_dashboard_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Char('r') => {
                tracing::info!("manual refresh");
                self.scheduler.refresh_now();
            }
            KeyCode::Enter => {
                if let Some(id) = self.rows.get(self.dash_selected).map(|r| r.id.clone()) {
                    self.open_detail(id);
                }
            }
            KeyCode::Char('s') => self.modal = Some(Modal::Settings(SettingsDialog::new(self.config))),
            KeyCode::Char('a') => self.modal = Some(Modal::AddDevice(DeviceForm::new())),
            KeyCode::Up | KeyCode::Char('k') => self.dash_selected = self.dash_selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.dash_selected += 1;
                clamp_selection(&mut self.dash_selected, self.rows.len());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(row) = self.rows.get(self.dash_selected) {
                    self.modal = Some(Modal::ConfirmDelete {
                        ids: vec![row.id.clone()],
                        question: format!("Delete device '{}' ({})?", row.name, row.ip),
                        origin: Tab::Dashboard,
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_devices_key(&mut self, k: KeyEvent) {
        let len = self.inventory.as_ref().map(Vec::len).unwrap_or(0);
        match k.code {
            KeyCode::Char('r') => self.load_inventory(),
            KeyCode::Char('a') => self.modal = Some(Modal::AddDevice(DeviceForm::new())),
            KeyCode::Up | KeyCode::Char('k') => self.inv_selected = self.inv_selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.inv_selected += 1;
                clamp_selection(&mut self.inv_selected, len);
            }
            KeyCode::Char(' ') => {
                if let Some(d) = self.inventory.as_ref().and_then(|v| v.get(self.inv_selected)) {
                    if !self.inv_marked.remove(&d.id) {
                        self.inv_marked.insert(d.id.clone());
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(d) = self.inventory.as_ref().and_then(|v| v.get(self.inv_selected)) {
                    self.modal = Some(Modal::AddDevice(DeviceForm::edit(d)));
                }
            }
            KeyCode::Enter => {
                let id = self
                    .inventory
                    .as_ref()
                    .and_then(|v| v.get(self.inv_selected))
                    .map(|d| d.id.clone());
                if let Some(id) = id {
                    self.open_detail(id);
                }
            }
            KeyCode::Char('A') => {
                let all = self.inventory.as_deref().unwrap_or_default();
                if self.inv_marked.len() == all.len() {
                    self.inv_marked.clear();
                } else {
                    self.inv_marked = all.iter().map(|d| d.id.clone()).collect();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let ids: Vec<String> = if self.inv_marked.is_empty() {
                    self.inventory
                        .as_ref()
                        .and_then(|v| v.get(self.inv_selected))
                        .map(|d| vec![d.id.clone()])
                        .unwrap_or_default()
                } else {
                    self.inv_marked.iter().cloned().collect()
                };
                if ids.is_empty() {
                    self.notify(NoticeLevel::Warning, "No device selected");
                    return;
                }
                self.modal = Some(Modal::ConfirmDelete {
                    question: format!("Delete {} selected device(s)?", ids.len()),
                    ids,
                    origin: Tab::Devices,
                });
            }
            _ => {}
        }
    }

    // Returns the modal to keep open, if any.
    fn handle_modal_key(&mut self, modal: Modal, k: KeyEvent) -> Option<Modal> {
        match modal {
            Modal::AddDevice(mut form) => match form.handle_key(k) {
                FormAction::Pending => Some(Modal::AddDevice(form)),
                FormAction::Cancel => None,
                FormAction::Invalid(msg) => {
                    self.notify(NoticeLevel::Warning, msg);
                    Some(Modal::AddDevice(form))
                }
                FormAction::Submit(device) => {
                    self.notify(
                        NoticeLevel::Info,
                        format!("Adding {}...", device.ip),
                    );
                    self.create_device(device);
                    None
                }
                FormAction::Update { id, update } => {
                    self.notify(NoticeLevel::Info, format!("Saving {}...", update.ip));
                    self.update_device(id, update);
                    None
                }
            },
            Modal::Settings(mut dialog) => match dialog.handle_key(k) {
                SettingsAction::Pending => Some(Modal::Settings(dialog)),
                SettingsAction::Cancel => None,
                SettingsAction::Save(cfg) => {
                    self.save_config(cfg);
                    None
                }
            },
            Modal::ConfirmDelete { ids, origin, .. } => {
                if matches!(k.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.delete_devices(ids, origin);
                }
                None
            }
        }
    }

    // ---- drawing ----

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, body, footer
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header (2 lines + rule)
                Constraint::Min(8),    // body
                Constraint::Length(1), // footer
            ])
            .split(area);

        let backend = self.client.base_url().to_string();
        draw_header(
            f,
            rows[0],
            &HeaderInfo {
                tab: self.tab,
                backend: &backend,
                summary: self.summary,
                updated: self.last_updated.as_deref(),
                error: self.last_error.as_deref(),
                config: self.config,
                polling: self.scheduler.is_running(),
            },
        );

        match self.tab {
            Tab::Dashboard => {
                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(45), Constraint::Min(5)])
                    .split(rows[1]);
                let charts = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(body[0]);
                self.cpu_chart.draw(f, charts[0]);
                self.mem_chart.draw(f, charts[1]);
                draw_device_table(f, body[1], &self.rows, self.dash_selected);
            }
            Tab::Devices => {
                let inv = self
                    .inventory
                    .as_ref()
                    .map(|v| inventory_rows(v, &self.inv_marked));
                draw_inventory(f, rows[1], inv.as_deref(), self.inv_selected);
            }
            Tab::Detail => {
                let fields = self.detail_data.as_ref().map(detail_fields);
                let ifaces = self
                    .detail_data
                    .as_ref()
                    .map(|d| interface_rows(&d.interfaces))
                    .unwrap_or_default();
                draw_detail(
                    f,
                    rows[1],
                    &DetailView {
                        fields: fields.as_deref(),
                        interfaces: &ifaces,
                        cpu: &self.detail_cpu,
                        memory: &self.detail_mem,
                    },
                );
            }
        }

        draw_footer(
            f,
            rows[2],
            self.notice.as_ref(),
            " q quit · Tab switch view · ↑/↓ select · Enter detail · r refresh",
        );

        match &self.modal {
            Some(Modal::AddDevice(form)) => form.draw(f, area),
            Some(Modal::Settings(dialog)) => dialog.draw(f, area),
            Some(Modal::ConfirmDelete { question, .. }) => draw_confirm(f, area, question),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Cycle;
    use crate::types::{DashboardData, Device, DeviceStatus};

    fn app() -> App {
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        App::new(client, RefreshConfig::default())
    }

    fn data(cpus: &[Option<f64>]) -> DashboardData {
        let devices: Vec<Device> = cpus
            .iter()
            .enumerate()
            .map(|(i, cpu)| Device {
                id: format!("d{i}"),
                name: format!("dev{i}"),
                ip: format!("10.0.0.{i}"),
                vendor: "Huawei".into(),
                port: Some(22),
                status: DeviceStatus::Online,
                cpu: *cpu,
                memory: Some(50.0),
                temperature: None,
            })
            .collect();
        DashboardData {
            total: devices.len(),
            online: devices.len(),
            offline: 0,
            devices,
        }
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut a = app();
        a.apply_update(Update::Snapshot {
            seq: 5,
            cycle: Cycle::Slow,
            data: data(&[Some(10.0), Some(20.0)]),
        });
        a.apply_update(Update::Snapshot {
            seq: 3,
            cycle: Cycle::Manual,
            data: data(&[Some(90.0)]),
        });
        assert_eq!(a.rows.len(), 2);
        assert_eq!(a.summary.map(|s| s.total), Some(2));
        assert_eq!(a.history.len(), 1);
        assert_eq!(a.history.latest().map(|s| s.cpu), Some(15));
    }

    #[test]
    fn metrics_update_touches_chart_only() {
        let mut a = app();
        a.apply_update(Update::Metrics {
            seq: 1,
            devices: data(&[Some(40.0)]).devices,
        });
        assert!(a.rows.is_empty());
        assert!(a.summary.is_none());
        assert_eq!(a.history.len(), 1);
        assert_eq!(a.cpu_chart.builds(), 1);

        // No qualifying device: chart and history stay put.
        a.apply_update(Update::Metrics {
            seq: 2,
            devices: data(&[None]).devices,
        });
        assert_eq!(a.history.len(), 1);
    }

    #[test]
    fn failure_marks_data_stale_until_next_success() {
        let mut a = app();
        a.apply_update(Update::Failed {
            cycle: Cycle::Fast,
            error: "backend unreachable".into(),
        });
        assert_eq!(a.last_error.as_deref(), Some("backend unreachable"));
        a.apply_update(Update::Metrics {
            seq: 1,
            devices: data(&[Some(1.0)]).devices,
        });
        assert!(a.last_error.is_none());
    }

    #[test]
    fn partial_delete_failure_warns() {
        let mut a = app();
        a.inv_marked.insert("gone".into());
        // reload() spawns; give it a runtime.
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let _guard = rt.enter();
        a.apply_outcome(ActionOutcome::Deleted {
            deleted: 1,
            failed: vec!["device not found".into()],
            origin: Tab::Devices,
        });
        let n = a.notice.as_ref().unwrap();
        assert_eq!(n.level, NoticeLevel::Warning);
        assert!(n.text.contains("1 deleted, 1 failed"));
        assert!(a.inv_marked.is_empty());
    }

    fn detail(id: &str, cpu: &[Option<f64>]) -> DeviceDetail {
        DeviceDetail {
            id: id.into(),
            name: id.into(),
            vendor: "Huawei".into(),
            ip: "10.0.0.1".into(),
            port: Some(22),
            status: DeviceStatus::Online,
            hostname: None,
            model: None,
            serial_number: None,
            version: None,
            uptime: None,
            cpu: cpu.last().copied().flatten(),
            memory: None,
            temperature: None,
            interfaces: Vec::new(),
            history: crate::types::DetailHistory {
                timestamps: (0..cpu.len()).map(|i| format!("10:00:{i:02}")).collect(),
                cpu: cpu.to_vec(),
                memory: vec![Some(50.0); cpu.len()],
            },
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_dashboard_suspends_polling() {
        let mut a = app();
        a.scheduler.start(a.config);
        assert!(a.scheduler.is_running());
        tokio::time::sleep(Duration::from_millis(50)).await;

        a.switch_tab(Tab::Devices);
        assert!(!a.scheduler.is_running());
        while a.updates.try_recv().is_ok() {}

        // Well past both cadences: nothing may arrive while the dashboard is hidden.
        tokio::time::sleep(Duration::from_secs(3 * 3600)).await;
        assert!(a.updates.try_recv().is_err());

        a.switch_tab(Tab::Dashboard);
        assert!(a.scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn detail_view_owns_its_own_timer() {
        let mut a = app();
        a.scheduler.start(a.config);
        a.rows = device_rows(&data(&[Some(10.0)]).devices);

        a.handle_key(key(KeyCode::Enter));
        assert_eq!(a.tab, Tab::Detail);
        assert_eq!(a.detail.device(), Some("d0"));
        assert!(a.detail.is_running());
        assert!(!a.scheduler.is_running());

        // Esc goes back instead of quitting.
        a.handle_key(key(KeyCode::Esc));
        assert!(!a.should_quit);
        assert_eq!(a.tab, Tab::Dashboard);
        assert!(!a.detail.is_running());
        assert!(a.scheduler.is_running());
    }

    #[tokio::test]
    async fn detail_updates_for_other_devices_or_older_are_ignored() {
        let mut a = app();
        a.open_detail("a".into());
        a.apply_detail(DetailUpdate::Loaded {
            seq: 4,
            detail: detail("a", &[None, Some(20.0), Some(40.0)]),
        });
        assert_eq!(a.detail_cpu.model().map(|m| m.points.len()), Some(2));
        assert_eq!(a.detail_data.as_ref().and_then(|d| d.cpu), Some(40.0));

        a.apply_detail(DetailUpdate::Loaded {
            seq: 3,
            detail: detail("a", &[Some(90.0)]),
        });
        a.apply_detail(DetailUpdate::Loaded {
            seq: 9,
            detail: detail("b", &[Some(90.0)]),
        });
        assert_eq!(a.detail_data.as_ref().and_then(|d| d.cpu), Some(40.0));
        assert_eq!(a.detail_cpu.builds(), 1);

        a.apply_detail(DetailUpdate::Failed {
            id: "b".into(),
            error: "device not found".into(),
        });
        assert!(a.notice.is_none());
        a.apply_detail(DetailUpdate::Failed {
            id: "a".into(),
            error: "device not found".into(),
        });
        assert_eq!(a.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Danger));
    }

    #[tokio::test]
    async fn edit_form_opens_prefilled_from_inventory() {
        let mut a = app();
        a.switch_tab(Tab::Devices);
        a.apply_outcome(ActionOutcome::Inventory(Ok(vec![InventoryDevice {
            id: "dev-0001".into(),
            name: "core".into(),
            ip: "10.0.0.1".into(),
            port: 22,
            username: "admin".into(),
            vendor: "Huawei".into(),
            status: DeviceStatus::Online,
        }])));
        a.handle_key(key(KeyCode::Char('e')));
        match &a.modal {
            Some(Modal::AddDevice(form)) => assert!(form.is_edit()),
            _ => panic!("edit form not open"),
        }

        a.modal = None;
        a.apply_outcome(ActionOutcome::Updated(Err("device not found".into())));
        let n = a.notice.as_ref().unwrap();
        assert_eq!(n.level, NoticeLevel::Danger);
        assert!(n.text.contains("device not found"));
    }
}
