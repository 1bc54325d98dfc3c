use std::sync::Arc;

use super::{CommandRunner, WindowActivator, WindowError, WindowInfo};

// Every visible, titled top-level window, not just each process's main window.
const USER32_SHIM: &str = r#"Add-Type -TypeDefinition @"
using System;
using System.Collections.Generic;
using System.Diagnostics;
using System.Runtime.InteropServices;
using System.Text;
public static class NoteFocusUser32 {
    public delegate bool EnumProc(IntPtr hWnd, IntPtr lParam);
    [DllImport("user32.dll")] public static extern bool EnumWindows(EnumProc callback, IntPtr lParam);
    [DllImport("user32.dll")] public static extern bool IsWindowVisible(IntPtr hWnd);
    [DllImport("user32.dll")] public static extern int GetWindowTextLength(IntPtr hWnd);
    [DllImport("user32.dll", CharSet = CharSet.Unicode)] public static extern int GetWindowText(IntPtr hWnd, StringBuilder text, int maxCount);
    [DllImport("user32.dll")] public static extern uint GetWindowThreadProcessId(IntPtr hWnd, out uint processId);
    [DllImport("user32.dll")] public static extern bool ShowWindow(IntPtr hWnd, int nCmdShow);
    [DllImport("user32.dll")] public static extern bool SetForegroundWindow(IntPtr hWnd);
    [DllImport("user32.dll")] public static extern bool IsIconic(IntPtr hWnd);
    public static List<string> List() {
        var rows = new List<string>();
        EnumWindows(delegate (IntPtr hWnd, IntPtr lParam) {
            if (!IsWindowVisible(hWnd)) { return true; }
            int length = GetWindowTextLength(hWnd);
            if (length == 0) { return true; }
            var title = new StringBuilder(length + 1);
            GetWindowText(hWnd, title, title.Capacity);
            uint pid;
            GetWindowThreadProcessId(hWnd, out pid);
            string owner = "";
            try { owner = Process.GetProcessById((int)pid).ProcessName; } catch (Exception) { }
            rows.Add(hWnd.ToInt64() + "\t" + owner + "\t" + title.ToString());
            return true;
        }, IntPtr.Zero);
        return rows;
    }
}
"@
"#;

const SW_RESTORE: i32 = 9;

/// Windows activator using a small PowerShell `user32` shim.
pub struct PowerShellActivator {
    runner: Arc<dyn CommandRunner>,
}

impl PowerShellActivator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn powershell(&self, script: &str) -> Result<String, WindowError> {
        Ok(self.runner.run(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", script],
        )?)
    }
}

impl WindowActivator for PowerShellActivator {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn list_visible_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        let output = self.powershell(&format!("{}[NoteFocusUser32]::List()", USER32_SHIM))?;
        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_line)
            .collect()
    }

    fn raise(&self, window: &WindowInfo) -> Result<(), WindowError> {
        // The handle went through parse_line, so it is numeric.
        let script = format!(
            "{shim}$h = [IntPtr]{handle}\n\
             if ([NoteFocusUser32]::IsIconic($h)) {{ [void][NoteFocusUser32]::ShowWindow($h, {restore}) }}\n\
             [void][NoteFocusUser32]::SetForegroundWindow($h)",
            shim = USER32_SHIM,
            handle = window.id,
            restore = SW_RESTORE,
        );
        self.powershell(&script)?;
        Ok(())
    }
}

// Line format: `<hwnd>\t<process>\t<title>`
fn parse_line(line: &str) -> Result<WindowInfo, WindowError> {
    let mut fields = line.trim_end_matches('\r').splitn(3, '\t');
    let (Some(handle), Some(owner), Some(title)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(WindowError::Parse {
            backend: "powershell",
            line: line.to_string(),
        });
    };

    let handle: i64 = handle.trim().parse().map_err(|_| WindowError::Parse {
        backend: "powershell",
        line: line.to_string(),
    })?;

    Ok(WindowInfo {
        id: handle.to_string(),
        owner: owner.trim().to_string(),
        title: title.trim().to_string(),
    })
}
