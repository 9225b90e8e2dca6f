use std::io;
use std::io::Stdout;

use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyCode};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::info;
use tui::backend::CrosstermBackend;
use tui::layout::{Alignment, Constraint, Direction, Layout};
use tui::style::{Color, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::Terminal;

use backlight_control::backlight::{Backlight, Output};
use backlight_control::config::BacklightConfig;

use crate::sim_gpio::SimGpio;
use crate::sim_ledc::{SimLedc, CHANNELS, TIMERS};

mod sim_error;
mod sim_gpio;
mod sim_ledc;

type SimBacklight<'a> = Backlight<'a, SimGpio, SimLedc>;

/// Dims a simulated LCD backlight from the keyboard
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// GPIO the backlight is wired to
    #[arg(long, default_value_t = 23)]
    gpio: u8,
    /// Switch the backlight on and off instead of dimming it with PWM
    #[arg(long)]
    digital: bool,
    /// LEDC channel
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..CHANNELS as i64))]
    channel: u8,
    /// LEDC timer
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..TIMERS as i64))]
    timer: u8,
    /// Backlight is lit when the pin is low
    #[arg(long)]
    invert: bool,
    /// Initial brightness in percent
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    brightness: i32,
    /// Brightness change per key press
    #[arg(long, default_value_t = 10)]
    step: i32,
}

impl Args {
    fn backlight_config(&self) -> BacklightConfig {
        let config = if self.digital {
            BacklightConfig::digital(self.gpio)
        } else {
            BacklightConfig::pwm(self.gpio, self.channel, self.timer)
        };
        config.inverted(self.invert)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = args.backlight_config();

    let gpio = SimGpio::new();
    let ledc = SimLedc::new();
    let mut backlight = Backlight::new(&config, &gpio, &ledc).map_err(|e| e.to_string())?;
    backlight.set_brightness(args.brightness);

    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut backlight, &config, &gpio, &ledc, args.step);

    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    let output = backlight.output();
    backlight.delete();
    info!("Backlight deleted");
    for line in report(output, &gpio, &ledc) {
        println!("{}", line);
    }

    Ok(result?)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    backlight: &mut SimBacklight<'_>,
    config: &BacklightConfig,
    gpio: &SimGpio,
    ledc: &SimLedc,
    step: i32,
) -> io::Result<()> {
    loop {
        let output = backlight.output();
        draw_tui(
            terminal,
            backlight.brightness(),
            lit_fraction(output, config, gpio, ledc),
            &report(output, gpio, ledc),
        )?;

        if let CEvent::Key(key) = event::read()? {
            let brightness = backlight.brightness() as i32;
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                KeyCode::Up | KeyCode::Right | KeyCode::Char('+') => {
                    backlight.set_brightness(brightness + step)
                }
                KeyCode::Down | KeyCode::Left | KeyCode::Char('-') => {
                    backlight.set_brightness(brightness - step)
                }
                KeyCode::Char('f') => backlight.on(),
                KeyCode::Char('0') => backlight.off(),
                KeyCode::Char(digit @ '1'..='9') => {
                    let tens = digit.to_digit(10).unwrap_or(0) as i32;
                    backlight.set_brightness(tens * 10)
                }
                _ => {}
            }
        }
    }
}

/// How much light the panel emits, 0.0..=1.0. An inverted backlight is lit while the pad is low.
fn lit_fraction(output: Output, config: &BacklightConfig, gpio: &SimGpio, ledc: &SimLedc) -> f64 {
    let pad_high = match output {
        Output::Pwm { channel } => ledc.pad_high_fraction(channel).unwrap_or(0.0),
        Output::Digital { pin } => match gpio.pin(pin) {
            Some(state) if state.pad_high() => 1.0,
            _ => 0.0,
        },
    };
    if config.output_invert {
        1.0 - pad_high
    } else {
        pad_high
    }
}

/// Register view of the peripheral behind the backlight
fn report(output: Output, gpio: &SimGpio, ledc: &SimLedc) -> Vec<String> {
    match output {
        Output::Pwm { channel } => {
            let mut lines = vec![];
            if let Some(state) = ledc.channel(channel) {
                lines.push(format!(
                    "LEDC channel {} -> GPIO {}: {}",
                    channel,
                    state.pin,
                    if state.running { "running" } else { "stopped" }
                ));
                lines.push(format!(
                    "duty: {}{}",
                    state.duty,
                    if state.invert { " (inverted)" } else { "" }
                ));
                if let Some(timer) = ledc.timer(state.timer) {
                    lines.push(format!(
                        "timer {}: {} bit @ {} Hz, {:?} clock",
                        state.timer, timer.resolution_bits, timer.freq_hz, timer.clock
                    ));
                }
            }
            lines
        }
        Output::Digital { pin } => match gpio.pin(pin) {
            Some(state) => vec![
                format!(
                    "GPIO {}: {:?}{}, pad {}",
                    pin,
                    state.direction,
                    if state.inverted { " (inverted)" } else { "" },
                    if state.pad_selected { "selected" } else { "not selected" }
                ),
                format!(
                    "level: {}, pad: {}",
                    state.level as u8,
                    if state.pad_high() { "high" } else { "low" }
                ),
            ],
            None => vec![],
        },
    }
}

fn draw_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    brightness: u8,
    lit: f64,
    lines: &[String],
) -> io::Result<()> {
    terminal.draw(|rect| {
        let size = rect.size();
        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(2), Constraint::Length(2)].as_ref())
            .split(size);

        let width = vertical_layout[0].width.saturating_sub(2) as f64;
        let panel_paragraph = Paragraph::new(Spans::from(Span::styled(
            " ".repeat((width * lit).round() as usize),
            Style::default().bg(Color::Rgb(253, 244, 220)),
        )))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .title("LCD")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );

        let mut text = vec![Spans::from(Span::raw(format!("brightness: {}%", brightness)))];
        text.extend(lines.iter().map(|line| Spans::from(Span::raw(line.clone()))));
        let sim_paragraph = Paragraph::new(text).alignment(Alignment::Left);

        let help_paragraph = Paragraph::new(Spans::from(Span::raw(
            "+/-: dim   1..9: 10%..90%   f: full   0: off   q: quit",
        )))
        .block(Block::default().borders(Borders::TOP));

        rect.render_widget(panel_paragraph, vertical_layout[0]);
        rect.render_widget(sim_paragraph, vertical_layout[1]);
        rect.render_widget(help_paragraph, vertical_layout[2]);
    })?;
    Ok(())
}
