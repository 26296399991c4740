use std::io::{self, BufRead, Write};

use crate::error::{ClashError, Result};

/// 行式交互终端: 读取一行输入, 并承载所有交互输出
pub struct Terminal<R, W> {
    input: R,
    pub out: W,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// 打印提示并阻塞读取一行, 返回去除首尾空白后的内容
    ///
    /// 输入结束 (EOF) 时返回 [`ClashError::NoSelection`]
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Err(ClashError::NoSelection);
        }
        Ok(line.trim().to_string())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// 测试用: 以脚本化输入构造终端, 输出收集到内存
#[cfg(test)]
pub(crate) fn scripted(input: &str) -> Terminal<io::Cursor<Vec<u8>>, Vec<u8>> {
    Terminal::new(io::Cursor::new(input.as_bytes().to_vec()), Vec::new())
}
