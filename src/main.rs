// USART2(PA2/PA3, 115200bps) と ADC1(PA0) を初期化し、UART に2行出力して待機
// NUCLEO-F446RE では USART2 が ST-Link の仮想COMポートにつながっている
// レジスタ操作の手順は barebones-core 側、ここは PAC との接続とエントリポイントのみ

#![no_std]
#![no_main]
#![allow(clippy::empty_loop)]

// pick a panicking behavior
use panic_halt as _; // you can put a breakpoint on `rust_begin_unwind` to catch panics

// cortex-m コア向けのスタートアップ処理を提供
// メモリの初期化から例外テーブルのシンボル登録（リセット以外はダミーの定義）まで実施してくれる。
use cortex_m_rt::{entry, exception, ExceptionFrame};

// デバイスクレートを use することで割り込みベクタテーブルが登録される（"rt" feature）
use stm32f4::stm32f446;

use barebones_core::{startup, BringupConfig};

mod registers;
use registers::PacRegisters;

// semihosting はデバッガ接続時のみ（feature "semihosting"）
// 無効時も引数は評価するので未使用警告は出ない
#[cfg(feature = "semihosting")]
macro_rules! trace {
    ($($arg:tt)*) => {
        let _ = cortex_m_semihosting::hprintln!($($arg)*);
    };
}

#[cfg(not(feature = "semihosting"))]
macro_rules! trace {
    ($($arg:tt)*) => {
        let _ = format_args!($($arg)*);
    };
}

// リセット直後の HSI 16MHz のまま使う（クロック切り替えは無効）
// ハングさせたくない場合は poll_limit に読み出し回数の上限を入れる
const CONFIG: BringupConfig = BringupConfig::DEFAULT;

#[entry]
fn main() -> ! {
    let peripheral = match stm32f446::Peripherals::take() {
        Some(peripheral) => peripheral,
        None => error_handler(),
    };
    let mut regs = PacRegisters::new(peripheral);

    let sent = match CONFIG.poll_limit {
        Some(limit) => match startup::run_within(&mut regs, &CONFIG, limit) {
            Ok(sent) => sent,
            Err(err) => {
                trace!("bring-up failed: {}", err);
                error_handler()
            }
        },
        None => startup::run(&mut regs, &CONFIG),
    };
    trace!("bring-up complete, {} bytes sent", sent);

    // 以降は何もしない（ADC は電源ON・変換待ちのまま）
    loop {}
}

// 復帰不能時の終着点
// 割り込みを全て禁止して停止（デバッガで止めれば原因を追える）
fn error_handler() -> ! {
    cortex_m::interrupt::disable();
    loop {}
}

#[exception]
unsafe fn HardFault(_frame: &ExceptionFrame) -> ! {
    error_handler()
}
