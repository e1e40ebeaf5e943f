//! Local channels: desktop toast and audible beep

use super::error::{NotifyError, NotifyResult};
use super::types::ChannelKind;
use std::time::Duration;
use tokio::process::Command;

const APP_NAME: &str = "Watcher";

/// Show a desktop notification through the platform's helper program.
pub(crate) async fn show_toast(title: &str, message: &str, timeout: Duration) -> NotifyResult<()> {
    let channel = ChannelKind::Toast;
    let (program, mut cmd) = toast_command(title, message).ok_or(NotifyError::Unsupported { channel })?;
    cmd.kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| NotifyError::Spawn {
            channel,
            program,
            source,
        })?,
        Err(_) => {
            return Err(NotifyError::Timeout {
                channel,
                duration: timeout,
            });
        }
    };

    if !output.status.success() {
        return Err(NotifyError::CommandFailed {
            channel,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    log::debug!("💬 Toast shown via {program}");
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn toast_command(title: &str, message: &str) -> Option<(&'static str, Command)> {
    let mut cmd = Command::new("notify-send");
    cmd.arg(format!("--app-name={APP_NAME}")).arg(title).arg(message);
    Some(("notify-send", cmd))
}

#[cfg(target_os = "macos")]
fn toast_command(title: &str, message: &str) -> Option<(&'static str, Command)> {
    let script = format!(
        "display notification \"{}\" with title \"{}\" subtitle \"{APP_NAME}\"",
        applescript_escape(message),
        applescript_escape(title)
    );
    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    Some(("osascript", cmd))
}

#[cfg(windows)]
fn toast_command(title: &str, message: &str) -> Option<(&'static str, Command)> {
    let script = format!(
        r#"[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] > $null
$xml = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02)
$text = $xml.GetElementsByTagName('text')
$text.Item(0).AppendChild($xml.CreateTextNode('{}')) > $null
$text.Item(1).AppendChild($xml.CreateTextNode('{}')) > $null
$toast = [Windows.UI.Notifications.ToastNotification]::new($xml)
[Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{APP_NAME}').Show($toast)"#,
        powershell_escape(title),
        powershell_escape(message)
    );
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()]);
    Some(("powershell", cmd))
}

#[cfg(not(any(unix, windows)))]
fn toast_command(_title: &str, _message: &str) -> Option<(&'static str, Command)> {
    None
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg_attr(not(windows), allow(dead_code))]
fn powershell_escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Two short tones on the default audio output.
#[cfg(feature = "audio")]
pub(crate) async fn beep(timeout: Duration) -> NotifyResult<()> {
    let channel = ChannelKind::Beep;
    // rodio's output stream is not Send, so it lives on a blocking thread
    let task = tokio::task::spawn_blocking(play_tones);
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(NotifyError::Audio {
            description: e.to_string(),
        }),
        Err(_) => Err(NotifyError::Timeout {
            channel,
            duration: timeout,
        }),
    }
}

#[cfg(feature = "audio")]
fn play_tones() -> NotifyResult<()> {
    use rodio::source::{SineWave, Source, Zero};
    use rodio::{OutputStream, Sink};

    let audio_error = |description: String| NotifyError::Audio { description };

    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| audio_error(format!("no audio output stream: {e}")))?;
    let sink = Sink::try_new(&handle).map_err(|e| audio_error(format!("no audio sink: {e}")))?;

    sink.append(SineWave::new(1000.0).take_duration(Duration::from_millis(250)).amplify(0.3));
    sink.append(Zero::<f32>::new(1, 48_000).take_duration(Duration::from_millis(50)));
    sink.append(SineWave::new(1200.0).take_duration(Duration::from_millis(250)).amplify(0.3));
    sink.sleep_until_end();
    Ok(())
}

/// Terminal bell when built without audio support.
///
/// A bell written to a file or pipe is never heard, so a redirected stdout
/// counts as a failed delivery.
#[cfg(not(feature = "audio"))]
pub(crate) async fn beep(_timeout: Duration) -> NotifyResult<()> {
    use std::io::IsTerminal;

    let is_terminal = std::io::stdout().is_terminal();
    ring_bell(tokio::io::stdout(), is_terminal).await
}

#[cfg_attr(feature = "audio", allow(dead_code))]
async fn ring_bell<W>(mut out: W, is_terminal: bool) -> NotifyResult<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::AsyncWriteExt;

    if !is_terminal {
        return Err(NotifyError::Audio {
            description: "stdout is not a terminal, the bell would not be heard".to_string(),
        });
    }
    let ring = async {
        out.write_all(b"\x07\x07").await?;
        out.flush().await
    };
    ring.await.map_err(|e| NotifyError::Audio {
        description: format!("terminal bell failed: {e}"),
    })
}
