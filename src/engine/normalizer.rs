// ==========================================
// 梳棉机保养跟踪系统 - 名称规范化器
// ==========================================
// 职责: 把自由文本的保养项目名称规范成可比较的
//       标准形式, 并把复合项目串拆成原子项目
// 红线: 纯函数, 幂等; 仅做字面规范化, 不做语义匹配
// ==========================================
// 现场单元格里常见阿拉伯文/英文混写、多余空白、
// 标点噪声与换行拼接, 规范化需要把这些全部抹平
// ==========================================

/// 默认复合分隔符集: `+`、`,`、换行、`;`
pub const DEFAULT_DELIMITERS: &[char] = &['+', ',', '\n', ';'];

/// 名称规范化器
///
/// delimiters 为复合项目串的分隔符集, 统一在这里配置,
/// 不在调用点分散维护
#[derive(Debug, Clone)]
pub struct Normalizer {
    delimiters: Vec<char>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_vec(),
        }
    }
}

impl Normalizer {
    /// 用自定义分隔符集创建规范化器
    pub fn with_delimiters(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }

    /// 规范化项目名称
    ///
    /// # 规则
    /// 1. 换行统一替换为 `+` 连接符 (多行单元格视为复合项目)
    /// 2. 保留集之外的字符替换为单个空格;
    ///    保留集 = ASCII 字母数字 + 阿拉伯文字母 + `+` + 空白 + `_` `/` `.` `-`
    /// 3. 连续空白折叠为一个空格, 去除首尾空白
    /// 4. 转小写
    ///
    /// # 保证
    /// - 幂等: normalize_name(normalize_name(x)) == normalize_name(x)
    /// - 仅大小写/空白/标点噪声不同的两个名称规范化后相等
    pub fn normalize_name(&self, text: &str) -> String {
        // 换行 -> '+' (兼容 \r\n / \r)
        let joined = text.replace("\r\n", "+").replace(['\n', '\r'], "+");

        // 保留集之外的字符 -> 空格
        let cleaned: String = joined
            .chars()
            .map(|c| if is_kept_char(c) { c } else { ' ' })
            .collect();

        // 折叠空白 + trim + 小写
        cleaned
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// 拆分复合项目串为原子项目序列
    ///
    /// # 规则
    /// - 按分隔符集的任意字符切分
    /// - 每段去除首尾空白, 丢弃空段
    /// - 输出顺序与输入出现顺序一致 (不排序),
    ///   未做项目的展示顺序依赖这一点
    pub fn split_service_list(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        text.split(self.delimiters.as_slice())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 规范化保留集判定
///
/// 阿拉伯文覆盖基本区、补充区与两个表现形式区,
/// 现场录入的旧数据里两种形式都出现过
fn is_kept_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || is_arabic_letter(c)
        || c.is_whitespace()
        || matches!(c, '+' | '_' | '/' | '.' | '-')
}

fn is_arabic_letter(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}
