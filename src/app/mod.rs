// mainから直接呼び出すアプリケーションの動作モード(C, S)のモジュール

mod calculator;
mod simulator;

pub use calculator::CalculatorApp;
pub use simulator::SimulatorApp;
