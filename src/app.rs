//! egui 主界面：任务/时长输入、开始/中断、MM:SS 倒计时与窗口标题同步

use chrono::Utc;
use eframe::egui;
use egui::emath::NumExt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::FormError;
use crate::form::NewCycleForm;
use crate::session::CycleSession;

/// 计时中的重绘间隔，小于采样间隔以免漏秒
const REPAINT_INTERVAL: Duration = Duration::from_millis(200);

mod theme {
    /// 计时中：番茄红
    pub const ACCENT_RGB: (u8, u8, u8) = (217, 17, 83);
    /// 空闲：绿色
    pub const IDLE_RGB: (u8, u8, u8) = (100, 220, 130);
    pub const BG_RGB: (u8, u8, u8) = (18, 18, 24);
    pub const TEXT_WHITE: (u8, u8, u8) = (255, 255, 255);
    pub const TEXT_DIM: (u8, u8, u8) = (200, 200, 210);
    pub const ERROR_RGB: (u8, u8, u8) = (247, 90, 104);

    pub fn color((r, g, b): (u8, u8, u8)) -> egui::Color32 {
        egui::Color32::from_rgb(r, g, b)
    }
}

/// 加载系统中文字体，找不到时保留 egui 默认字体
fn setup_chinese_fonts(ctx: &egui::Context) {
    #[cfg(windows)]
    let candidates = [
        r"C:\Windows\Fonts\msyh.ttc",
        r"C:\Windows\Fonts\simhei.ttf",
    ];
    #[cfg(target_os = "macos")]
    let candidates = [
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/STHeiti Light.ttc",
    ];
    #[cfg(not(any(windows, target_os = "macos")))]
    let candidates = [
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    ];

    let Some((path, bytes)) = candidates
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|b| (*p, b)))
    else {
        tracing::debug!("no CJK system font found, using egui defaults");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
    tracing::debug!(path, "loaded CJK font");
}

/// 文字居中的按钮
fn centered_button(ui: &mut egui::Ui, text: impl Into<egui::WidgetText>, size: egui::Vec2, fill: egui::Color32) -> egui::Response {
    let size = size.at_least(ui.spacing().interact_size);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let visuals = ui.style().interact(&response);
    let expanded = rect.expand(visuals.expansion);
    let fill = if ui.is_enabled() { fill } else { visuals.bg_fill };
    ui.painter().rect_filled(expanded, visuals.corner_radius, fill);
    ui.painter().rect_stroke(
        expanded,
        visuals.corner_radius,
        visuals.bg_stroke,
        egui::StrokeKind::Outside,
    );
    let widget_text: egui::WidgetText = text.into();
    let galley = widget_text.into_galley(ui, None, rect.width() - 8.0, egui::TextStyle::Button);
    let pos = rect.center() - galley.size() / 2.0;
    let text_color = if ui.is_enabled() {
        theme::color(theme::TEXT_WHITE)
    } else {
        ui.visuals().gray_out(ui.visuals().text_color())
    };
    ui.painter().galley(pos, galley, text_color);
    response
}

fn form_error_label(error: FormError) -> &'static str {
    match error {
        FormError::TaskRequired => "请填写任务",
        FormError::DurationNotANumber => "时长必须是整数分钟",
        FormError::DurationOutOfRange => "时长必须在 1 到 60 分钟之间",
    }
}

pub struct CycleTimerApp {
    config: AppConfig,
    session: CycleSession,
    form: NewCycleForm,
    /// 上次发给窗口的标题，变化时才重发
    last_title: String,
}

impl CycleTimerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        setup_chinese_fonts(&cc.egui_ctx);
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            form: NewCycleForm::new(config.default_minutes_amount),
            last_title: config.idle_title.clone(),
            session: CycleSession::new(),
            config,
        }
    }

    fn start(&mut self) {
        match self.form.submit_to(&mut self.session, Utc::now()) {
            Ok(Some(id)) => tracing::debug!(cycle_id = %id, "cycle started from form"),
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "failed to start cycle"),
        }
    }

    fn stop(&mut self) {
        if let Err(e) = self.session.interrupt_current_cycle(Utc::now()) {
            tracing::error!(error = %e, "failed to interrupt cycle");
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = self.session.window_title(&self.config.idle_title);
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    fn ui_form(&mut self, ui: &mut egui::Ui, running: bool) {
        ui.add_enabled_ui(!running, |ui| {
            ui.horizontal(|ui| {
                ui.label("我要专注于");
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.task)
                        .hint_text("给任务起个名字")
                        .desired_width(180.0),
                );
                if !self.config.task_suggestions.is_empty() {
                    ui.menu_button("▾", |ui| {
                        for suggestion in &self.config.task_suggestions {
                            if ui.button(suggestion.as_str()).clicked() {
                                self.form.choose_suggestion(suggestion);
                                ui.close();
                            }
                        }
                    });
                }
            });
            if let Some(error) = self.form.errors().task {
                ui.colored_label(theme::color(theme::ERROR_RGB), form_error_label(error));
            }

            ui.horizontal(|ui| {
                ui.label("持续");
                if ui.small_button("−").clicked() {
                    self.form.step_minutes(false);
                }
                ui.add(
                    egui::TextEdit::singleline(&mut self.form.minutes_amount)
                        .hint_text("00")
                        .desired_width(40.0),
                );
                if ui.small_button("+").clicked() {
                    self.form.step_minutes(true);
                }
                ui.label("分钟");
            });
            if let Some(error) = self.form.errors().minutes_amount {
                ui.colored_label(theme::color(theme::ERROR_RGB), form_error_label(error));
            }
        });
    }

    fn ui_countdown(&self, ui: &mut egui::Ui, accent: egui::Color32) {
        let countdown = self.session.countdown();
        let [m1, m2, s1, s2] = countdown.digits();
        ui.label(
            egui::RichText::new(format!("{m1}{m2}:{s1}{s2}"))
                .color(theme::color(theme::TEXT_WHITE))
                .size(64.0)
                .monospace(),
        );
        ui.add_space(4.0);
        ui.add(
            egui::ProgressBar::new(self.session.progress())
                .desired_width(300.0)
                .fill(accent),
        );
    }
}

impl eframe::App for CycleTimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(e) = self.session.tick(Utc::now()) {
            tracing::error!(error = %e, "clock tick failed");
        }
        let running = self.session.active_cycle().is_some();
        if running {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
        self.sync_title(ctx);

        let accent = theme::color(if running { theme::ACCENT_RGB } else { theme::IDLE_RGB });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(theme::color(theme::BG_RGB)).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    self.ui_form(ui, running);
                    ui.add_space(24.0);

                    let status = match self.session.active_cycle() {
                        Some(cycle) => cycle.task.clone(),
                        None => "空闲".to_owned(),
                    };
                    ui.label(egui::RichText::new(status).color(accent).size(18.0));
                    ui.add_space(8.0);

                    self.ui_countdown(ui, accent);
                    ui.add_space(24.0);

                    let btn_size = egui::vec2(160.0, 40.0);
                    if running {
                        if centered_button(ui, "中断", btn_size, theme::color(theme::ACCENT_RGB))
                            .on_hover_text("中断当前周期")
                            .clicked()
                        {
                            self.stop();
                        }
                    } else {
                        let enabled = !self.form.is_submit_disabled();
                        let clicked = ui
                            .add_enabled_ui(enabled, |ui| {
                                centered_button(ui, "开始", btn_size, theme::color(theme::IDLE_RGB))
                            })
                            .inner
                            .clicked();
                        if clicked {
                            self.start();
                        }
                    }

                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(format!("已记录 {} 个周期", self.session.store().cycles().len()))
                            .color(theme::color(theme::TEXT_DIM))
                            .size(12.0),
                    );
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_have_labels() {
        for e in [
            FormError::TaskRequired,
            FormError::DurationNotANumber,
            FormError::DurationOutOfRange,
        ] {
            assert!(!form_error_label(e).is_empty());
        }
    }

    #[test]
    fn app_starts_idle_with_configured_defaults() {
        let config = AppConfig {
            default_minutes_amount: 15,
            ..AppConfig::default()
        };
        let app = CycleTimerApp::with_config(config);
        assert_eq!(app.form.minutes_amount, "15");
        assert_eq!(app.last_title, "timer");
        assert!(app.session.active_cycle().is_none());
    }

    #[test]
    fn stop_without_active_cycle_is_harmless() {
        let mut app = CycleTimerApp::with_config(AppConfig::default());
        app.stop();
        assert!(app.session.store().cycles().is_empty());
    }

    #[test]
    fn start_creates_cycle_and_clears_form() {
        let mut app = CycleTimerApp::with_config(AppConfig::default());
        app.form.task = "Write report".into();
        app.start();
        assert_eq!(app.session.store().cycles().len(), 1);
        assert!(app.session.active_cycle().is_some());
        assert_eq!(app.form.task, "");
        app.stop();
        assert!(app.session.active_cycle().is_none());
    }
}
