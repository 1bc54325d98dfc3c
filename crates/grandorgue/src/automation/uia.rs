use std::sync::Arc;

use notefocus_core::CommandRunner;

use super::{AppHandle, AutomationError, UiAutomation};
use crate::menu::MenuPath;

const UIA_PRELUDE: &str = "Add-Type -AssemblyName UIAutomationClient, UIAutomationTypes\n\
$A = [System.Windows.Automation.AutomationElement]\n\
$Scope = [System.Windows.Automation.TreeScope]\n";

// Menu popups are parented to the desktop, so every segment after the first
// is searched from the root element.
const INVOKE_BODY: &str = r#"
$scope = $window
for ($i = 0; $i -lt $path.Count; $i++) {
    $cond = New-Object System.Windows.Automation.PropertyCondition($A::NameProperty, $path[$i])
    $item = $scope.FindFirst($Scope::Descendants, $cond)
    if (-not $item) { [Console]::Error.WriteLine("Menu item not found: " + $path[$i]); exit 2 }
    $expand = $null
    if ($i -lt $path.Count - 1 -and $item.TryGetCurrentPattern([System.Windows.Automation.ExpandCollapsePattern]::Pattern, [ref]$expand)) {
        $expand.Expand()
    } else {
        $item.GetCurrentPattern([System.Windows.Automation.InvokePattern]::Pattern).Invoke()
    }
    Start-Sleep -Milliseconds 150
    $scope = $A::RootElement
}
"#;

/// Windows backend: Microsoft UI Automation driven from PowerShell.
///
/// Menu items are expanded and invoked through their automation patterns, so
/// the target window does not need to be in the foreground.
pub struct UiaAutomation {
    runner: Arc<dyn CommandRunner>,
}

impl UiaAutomation {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

fn powershell(runner: &dyn CommandRunner, script: &str) -> Result<String, AutomationError> {
    Ok(runner.run(
        "powershell",
        &["-NoProfile", "-NonInteractive", "-Command", script],
    )?)
}

/// Single-quoted PowerShell literal.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl UiAutomation for UiaAutomation {
    fn connect(&self, title_pattern: &str) -> Result<Box<dyn AppHandle>, AutomationError> {
        let script = format!(
            "{prelude}foreach ($w in $A::RootElement.FindAll($Scope::Children, [System.Windows.Automation.Condition]::TrueCondition)) {{\n\
             if ($w.Current.Name -match {pattern}) {{ \"{{0}}`t{{1}}\" -f $w.Current.NativeWindowHandle, $w.Current.Name; break }}\n\
             }}",
            prelude = UIA_PRELUDE,
            pattern = ps_quote(title_pattern),
        );
        let output = powershell(self.runner.as_ref(), &script)?;

        let (handle, title) = output
            .lines()
            .find_map(|line| line.trim_end_matches('\r').split_once('\t'))
            .ok_or_else(|| AutomationError::NotRunning(title_pattern.to_string()))?;
        let handle: i64 = handle
            .trim()
            .parse()
            .map_err(|_| AutomationError::NotRunning(title_pattern.to_string()))?;

        log::info!("Connected to window '{}' ({})", title.trim(), handle);
        Ok(Box::new(UiaWindow {
            runner: self.runner.clone(),
            handle,
            title: title.trim().to_string(),
        }))
    }
}

struct UiaWindow {
    runner: Arc<dyn CommandRunner>,
    handle: i64,
    title: String,
}

impl AppHandle for UiaWindow {
    fn name(&self) -> &str {
        &self.title
    }

    fn invoke_menu_path(&self, path: &MenuPath) -> Result<(), AutomationError> {
        let segments: Vec<String> = path.segments().iter().map(|s| ps_quote(s)).collect();
        let script = format!(
            "{prelude}$window = $A::FromHandle([IntPtr]{handle})\n$path = @({segments})\n{body}",
            prelude = UIA_PRELUDE,
            handle = self.handle,
            segments = segments.join(", "),
            body = INVOKE_BODY,
        );
        log::debug!("Invoking '{}' on '{}'", path, self.title);
        powershell(self.runner.as_ref(), &script)?;
        Ok(())
    }
}
