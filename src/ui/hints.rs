//! Next-action hints shown after a command finishes.

use crate::locale::Locale;

/// After a run that completed.
pub fn after_successful_run(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Run `venvkeep list` to see installed packages.",
        Locale::Japanese => "`venvkeep list` でインストール済みパッケージを確認できます。",
    }
}

/// After a run where a step failed.
pub fn after_failed_run(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Fix the problem above and re-run `venvkeep run`.",
        Locale::Japanese => "上記の問題を解決してから `venvkeep run` を再実行してください。",
    }
}

/// When the environment directory exists but is unusable.
pub fn recreate_environment(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Run `venvkeep run --recreate` to rebuild the environment.",
        Locale::Japanese => "`venvkeep run --recreate` で仮想環境を作り直せます。",
    }
}

/// After a dry run.
pub fn after_dry_run(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Run without --dry-run to apply.",
        Locale::Japanese => "--dry-run を付けずに実行すると適用されます。",
    }
}
